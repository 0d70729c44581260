use std::{
    fmt,
    str::FromStr,
};
use crate::error::ValueError;
use super::Authority;

impl Authority {
    /// Whether a group at this level is required to sign off on a step.
    pub fn may_approve(&self) -> bool {
        *self >= Authority::Approve
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

impl From<Authority> for &'static str {
    fn from(authority: Authority) -> &'static str {
        match authority {
            Authority::None => "none",
            Authority::Review => "review",
            Authority::Approve => "approve",
            Authority::Admin => "admin",
        }
    }
}

impl FromStr for Authority {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "none" => Ok(Authority::None),
            "review" => Ok(Authority::Review),
            "approve" => Ok(Authority::Approve),
            "admin" => Ok(Authority::Admin),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

#[cfg(feature = "clap")]
mod clap {
    use ::clap::{
        ValueEnum,
        builder::PossibleValue,
    };
    use super::*;

    impl ValueEnum for Authority {
        fn value_variants<'a>() -> &'a [Self] {
            &[
                Authority::None,
                Authority::Review,
                Authority::Approve,
                Authority::Admin,
            ]
        }

        fn to_possible_value(&self) -> Option<PossibleValue> {
            Some(PossibleValue::new(<&'static str>::from(*self)))
        }
    }
}
