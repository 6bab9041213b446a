pub mod address;
pub mod node_status;
pub mod relations;
pub mod run;
