use std::ops::Deref;
use crate::error::ValueError;
use super::*;

impl Ancestry {
    pub fn resource(&self) -> Result<&Resource, ValueError> {
        self.0.first().ok_or(ValueError::Uninitialized)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.0.iter()
            .map(|resource| resource.id)
            .collect()
    }
}

impl From<Vec<Resource>> for Ancestry {
    fn from(args: Vec<Resource>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[Resource; N]> for Ancestry {
    fn from(args: [Resource; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for Ancestry {
    type Target = Vec<Resource>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
