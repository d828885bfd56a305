//! Non-functional tuning knobs for a [`Supervisor`](crate::supervisor::Supervisor).
//!
//! Deliberately small: quota/backpressure accounting and restart strategies
//! are explicit non-goals of the supervision core, so this does not grow
//! into a policy surface. What's here only shapes diagnostics.

/// Tuning for a single supervision.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Name used for a spawned task when the caller does not supply one.
    pub default_task_name: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            default_task_name: "task".to_string(),
        }
    }
}

impl SupervisorConfig {
    pub fn with_default_task_name(mut self, name: impl Into<String>) -> Self {
        self.default_task_name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_task_name_is_overridable() {
        let config = SupervisorConfig::default().with_default_task_name("worker");
        assert_eq!(config.default_task_name, "worker");
    }
}
