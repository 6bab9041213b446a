//! Textual step vocabulary
//!
//! Step text is matched against a fixed, ordered table of patterns and turned
//! into a [`Step`]. The keyword decides what a step means: `Given` steps
//! establish state, `When` steps act, `Then` steps assert.

use crate::errors::{StepError, StepResult};
use crate::identity::Label;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fmt;

/// Step keyword; `And` / `But` are resolved by the script runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Given,
    When,
    Then,
}

impl Keyword {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "Given" => Some(Keyword::Given),
            "When" => Some(Keyword::When),
            "Then" => Some(Keyword::Then),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Keyword::Given => write!(f, "Given"),
            Keyword::When => write!(f, "When"),
            Keyword::Then => write!(f, "Then"),
        }
    }
}

/// A parsed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// `{a} is (not) leasing (to) {b}`
    Leasing {
        from: Label,
        to: Label,
        negated: bool,
    },
    /// `{a} is (not) sponsoring {b}`
    Sponsoring {
        sponsor: Label,
        sponsored: Label,
        negated: bool,
    },
    /// `{s} has an association with {r} of type {n} (and anchor {h})`
    /// / `{s} does not have an association with {r} of type {n}`
    HasAssociation {
        sender: Label,
        party: Label,
        association_type: u64,
        anchor: Option<String>,
        negated: bool,
    },
    /// `{s} is (not) associated with {r}`
    Associated {
        sender: Label,
        party: Label,
        negated: bool,
    },
    /// `{u} has {amount} lto`
    Balance { user: Label, amount: String },
    /// `{a} (tries to lease|leases) {amount} lto to {b}`
    Lease {
        from: Label,
        to: Label,
        amount: String,
        attempt: bool,
    },
    /// `{a} (tries to cancel|cancels) the lease to {b}`
    CancelLease { from: Label, to: Label, attempt: bool },
    /// `{a} (tries to sponsor|sponsors) {b}`
    Sponsor {
        sponsor: Label,
        sponsored: Label,
        attempt: bool,
    },
    /// `{a} (tries to cancel|cancels) the sponsorship for {b}`
    CancelSponsorship {
        sponsor: Label,
        sponsored: Label,
        attempt: bool,
    },
    /// `{s} issues an association ((v{n})) with {r} of type {n}`
    IssueAssociation {
        sender: Label,
        party: Label,
        association_type: u64,
        version: Option<u8>,
        attempt: bool,
    },
    /// `{s} revokes the association ((v{n})) with {r} of type {n} (and anchor {h})`
    RevokeAssociation {
        sender: Label,
        party: Label,
        association_type: u64,
        version: Option<u8>,
        anchor: Option<String>,
        attempt: bool,
    },
    /// `{a} (tries to transfer|transfers) {amount} lto to {b}`
    Transfer {
        from: Label,
        to: Label,
        amount: String,
        attempt: bool,
    },
    /// `{u} (tries to anchor|anchors) ({source})`
    Anchor {
        user: Label,
        source: Option<String>,
        attempt: bool,
    },
    /// `the transaction (is successful|fails)`
    TransactionOutcome { success: bool },
}

impl Step {
    /// Whether the step may be used under `keyword`
    pub fn allowed_under(&self, keyword: Keyword) -> bool {
        match self {
            Step::Leasing { .. } | Step::Sponsoring { .. } | Step::Balance { .. } => {
                keyword != Keyword::When
            }
            Step::HasAssociation { .. } => keyword == Keyword::Given,
            Step::Associated { .. } | Step::TransactionOutcome { .. } => keyword == Keyword::Then,
            Step::Lease { .. }
            | Step::CancelLease { .. }
            | Step::Sponsor { .. }
            | Step::CancelSponsorship { .. }
            | Step::IssueAssociation { .. }
            | Step::RevokeAssociation { .. }
            | Step::Transfer { .. }
            | Step::Anchor { .. } => keyword == Keyword::When,
        }
    }
}

type Builder = fn(&Captures) -> StepResult<Step>;

lazy_static! {
    // Order matters: the first matching pattern wins.
    static ref PATTERNS: Vec<(Regex, Builder)> = vec![
        entry(
            r"^[Tt]he transaction (?P<result>is successful|succeeds|fails)$",
            |c| Ok(Step::TransactionOutcome { success: &c["result"] != "fails" }),
        ),
        entry(
            r"^(?P<s>.+?) does not have an association with (?P<r>.+?) of type (?P<t>\d+)$",
            |c| Ok(Step::HasAssociation {
                sender: label(c, "s"),
                party: label(c, "r"),
                association_type: number(c, "t")?,
                anchor: None,
                negated: true,
            }),
        ),
        entry(
            r"^(?P<s>.+?) has an association with (?P<r>.+?) of type (?P<t>\d+)(?: and anchor (?P<h>\S+))?$",
            |c| Ok(Step::HasAssociation {
                sender: label(c, "s"),
                party: label(c, "r"),
                association_type: number(c, "t")?,
                anchor: text(c, "h"),
                negated: false,
            }),
        ),
        entry(
            r"^(?P<s>.+?) is (?P<not>not )?associated with (?P<r>.+)$",
            |c| Ok(Step::Associated {
                sender: label(c, "s"),
                party: label(c, "r"),
                negated: c.name("not").is_some(),
            }),
        ),
        entry(
            r"^(?P<a>.+?) is (?P<not>not )?leasing (?:to )?(?P<b>.+)$",
            |c| Ok(Step::Leasing {
                from: label(c, "a"),
                to: label(c, "b"),
                negated: c.name("not").is_some(),
            }),
        ),
        entry(
            r"^(?P<a>.+?) is (?P<not>not )?sponsoring (?P<b>.+)$",
            |c| Ok(Step::Sponsoring {
                sponsor: label(c, "a"),
                sponsored: label(c, "b"),
                negated: c.name("not").is_some(),
            }),
        ),
        entry(
            r"^(?P<u>.+?) has (?P<amount>\S+) lto$",
            |c| Ok(Step::Balance {
                user: label(c, "u"),
                amount: c["amount"].to_string(),
            }),
        ),
        entry(
            r"^(?P<a>.+?) (?P<verb>tries to lease|leases) (?P<amount>\S+) lto to (?P<b>.+)$",
            |c| Ok(Step::Lease {
                from: label(c, "a"),
                to: label(c, "b"),
                amount: c["amount"].to_string(),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<a>.+?) (?P<verb>tries to cancel|cancels?) the lease to (?P<b>.+)$",
            |c| Ok(Step::CancelLease {
                from: label(c, "a"),
                to: label(c, "b"),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<a>.+?) (?P<verb>tries to cancel|cancels?) the sponsorship for (?P<b>.+)$",
            |c| Ok(Step::CancelSponsorship {
                sponsor: label(c, "a"),
                sponsored: label(c, "b"),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<a>.+?) (?P<verb>tries to sponsor|sponsors) (?P<b>.+)$",
            |c| Ok(Step::Sponsor {
                sponsor: label(c, "a"),
                sponsored: label(c, "b"),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<s>.+?) (?P<verb>tries to issue|issues) an association(?: \(v(?P<v>\d+)\))? with (?P<r>.+?) of type (?P<t>\d+)$",
            |c| Ok(Step::IssueAssociation {
                sender: label(c, "s"),
                party: label(c, "r"),
                association_type: number(c, "t")?,
                version: version(c)?,
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<s>.+?) (?P<verb>tries to revoke|revokes) (?:an|the) association(?: \(v(?P<v>\d+)\))? with (?P<r>.+?) of type (?P<t>\d+)(?: and anchor (?P<h>\S+))?$",
            |c| Ok(Step::RevokeAssociation {
                sender: label(c, "s"),
                party: label(c, "r"),
                association_type: number(c, "t")?,
                version: version(c)?,
                anchor: text(c, "h"),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<a>.+?) (?P<verb>tries to transfer|transfers) (?P<amount>\S+) lto to (?P<b>.+)$",
            |c| Ok(Step::Transfer {
                from: label(c, "a"),
                to: label(c, "b"),
                amount: c["amount"].to_string(),
                attempt: is_attempt(c),
            }),
        ),
        entry(
            r"^(?P<u>.+?) (?P<verb>tries to anchor|anchors)(?: (?P<h>\S+))?$",
            |c| Ok(Step::Anchor {
                user: label(c, "u"),
                source: text(c, "h"),
                attempt: is_attempt(c),
            }),
        ),
    ];
}

fn entry(pattern: &str, build: Builder) -> (Regex, Builder) {
    // Patterns are compile-time constants covered by the tests below
    let regex =
        Regex::new(pattern).unwrap_or_else(|e| panic!("invalid step pattern {}: {}", pattern, e));
    (regex, build)
}

fn label(c: &Captures, name: &str) -> Label {
    Label::new(c[name].trim())
}

fn text(c: &Captures, name: &str) -> Option<String> {
    c.name(name).map(|m| m.as_str().to_string())
}

fn is_attempt(c: &Captures) -> bool {
    c["verb"].starts_with("tries to")
}

fn number(c: &Captures, name: &str) -> StepResult<u64> {
    c[name]
        .parse()
        .map_err(|_| StepError::InvalidArgument(format!("'{}' is not a number", &c[name])))
}

fn version(c: &Captures) -> StepResult<Option<u8>> {
    c.name("v")
        .map(|m| {
            m.as_str()
                .parse()
                .map_err(|_| StepError::InvalidArgument(format!("'{}' is not a version", m.as_str())))
        })
        .transpose()
}

/// Match step text against the vocabulary
pub fn parse_step(text: &str) -> StepResult<Step> {
    let text = text.trim();
    for (pattern, build) in PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            return build(&captures);
        }
    }
    Err(StepError::Unmatched(text.to_string()))
}

/// Parse and check the step is valid under `keyword`
pub fn parse_for(keyword: Keyword, text: &str) -> StepResult<Step> {
    let step = parse_step(text)?;
    if !step.allowed_under(keyword) {
        return Err(StepError::WrongKeyword {
            keyword: keyword.to_string(),
            text: text.trim().to_string(),
        });
    }
    Ok(step)
}
