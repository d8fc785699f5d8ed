use crate::error::Result;
use crate::models::{ContainerId, SpaceApply};
use crate::services::spaces::ContainerService;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const DEFAULT_FALLBACK_SPACE: &str = "demo_space";
pub const FALLBACK_SPACE_NAME: &str = "Demo Space";
pub const FALLBACK_SPACE_DESCRIPTION: &str =
    "A demonstration space automatically created by the CDF file uploader.";

/// What to do when retrieving the target space fails with something other
/// than not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetErrorPolicy {
    /// Log the error and continue with the fallback space.
    #[default]
    Fallback,
    /// Return the error to the caller.
    Fail,
}

/// Finds a space that is guaranteed to exist: the target if possible,
/// otherwise the fallback, creating it when needed.
pub struct ContainerResolver {
    spaces: Arc<dyn ContainerService>,
    policy: TargetErrorPolicy,
}

impl ContainerResolver {
    pub fn new(spaces: Arc<dyn ContainerService>) -> Self {
        Self {
            spaces,
            policy: TargetErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TargetErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn resolve(&self, desired: &ContainerId, fallback: &ContainerId) -> Result<ContainerId> {
        match self.spaces.retrieve(desired).await {
            Ok(_) => {
                info!(space = %desired, "✅ Using target data modeling space");
                return Ok(desired.clone());
            }
            Err(e) if e.is_not_found() => {
                info!(space = %desired, "Target data modeling space not found");
            }
            Err(e) if self.policy == TargetErrorPolicy::Fail => return Err(e),
            Err(e) => {
                warn!(space = %desired, error = %e, "⚠️  Error retrieving target space, proceeding to fallback");
            }
        }

        if desired == fallback {
            info!(space = %fallback, "Target is the fallback space, creating it");
        } else {
            match self.spaces.retrieve(fallback).await {
                Ok(_) => {
                    info!(space = %fallback, "✅ Using fallback data modeling space");
                    return Ok(fallback.clone());
                }
                Err(e) if e.is_not_found() => {
                    info!(space = %fallback, "🪣 Fallback space not found, creating...");
                }
                Err(e) => {
                    warn!(space = %fallback, error = %e, "⚠️  Error retrieving fallback space, attempting creation");
                }
            }
        }

        let apply = SpaceApply {
            space: fallback.clone(),
            name: FALLBACK_SPACE_NAME.to_string(),
            description: FALLBACK_SPACE_DESCRIPTION.to_string(),
        };
        match self.spaces.create(apply).await {
            Ok(created) => {
                info!(space = %created.space, "✅ Fallback space created successfully");
                Ok(created.space)
            }
            Err(e) if e.is_duplicated() => {
                info!(space = %fallback, "Fallback space already exists, using it");
                Ok(fallback.clone())
            }
            Err(e) => {
                error!(space = %fallback, error = %e, "❌ Failed to create fallback space");
                Err(e)
            }
        }
    }
}
