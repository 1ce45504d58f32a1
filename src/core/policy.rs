use crate::domain::model::Source;
use crate::utils::error::SourceError;
use serde::{Deserialize, Serialize};

/// What to do with a composite when one downstream source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Leave the field empty and keep building the composite.
    TolerateAndNull,
    /// Fail the whole request with the downstream error.
    AbortRequest,
}

/// Per-source policy, split by failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePolicy {
    pub on_status: FailurePolicy,
    pub on_transport: FailurePolicy,
}

impl SourcePolicy {
    pub const TOLERATE_STATUS: SourcePolicy = SourcePolicy {
        on_status: FailurePolicy::TolerateAndNull,
        on_transport: FailurePolicy::AbortRequest,
    };

    pub const ABORT_ALL: SourcePolicy = SourcePolicy {
        on_status: FailurePolicy::AbortRequest,
        on_transport: FailurePolicy::AbortRequest,
    };

    pub fn for_error(&self, error: &SourceError) -> FailurePolicy {
        if error.is_status() {
            self.on_status
        } else {
            self.on_transport
        }
    }
}

/// Policies for one execution path. All three sources must be given when read from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathPolicy {
    pub product: SourcePolicy,
    pub recommendations: SourcePolicy,
    pub reviews: SourcePolicy,
}

impl PathPolicy {
    pub const fn uniform(policy: SourcePolicy) -> Self {
        Self {
            product: policy,
            recommendations: policy,
            reviews: policy,
        }
    }

    pub fn for_source(&self, source: Source) -> SourcePolicy {
        match source {
            Source::Product => self.product,
            Source::Recommendations => self.recommendations,
            Source::Reviews => self.reviews,
        }
    }
}

/// Failure policies for both execution paths.
///
/// The default keeps the established behaviour: the blocking path drops a
/// field on a non-2xx status and aborts on transport failures, the
/// non-blocking path aborts on anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailurePolicies {
    pub blocking: PathPolicy,
    pub non_blocking: PathPolicy,
}

impl Default for FailurePolicies {
    fn default() -> Self {
        Self {
            blocking: PathPolicy::uniform(SourcePolicy::TOLERATE_STATUS),
            non_blocking: PathPolicy::uniform(SourcePolicy::ABORT_ALL),
        }
    }
}
