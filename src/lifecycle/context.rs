/*!
 * Runtime Context
 * Per-session state owned by the supervisor
 */

use crate::apps::AppRegistry;
use crate::config::RuntimeConfig;
use crate::process::ProcessTable;
use std::sync::Arc;

/// Registry, process table and configuration of one runtime session
///
/// Constructed once per session. The process table is absent when
/// supervision is disabled.
pub struct RuntimeContext {
    config: RuntimeConfig,
    registry: Arc<AppRegistry>,
    processes: Option<Arc<ProcessTable>>,
}

impl RuntimeContext {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_registry(config, Arc::new(AppRegistry::new()))
    }

    pub fn with_registry(config: RuntimeConfig, registry: Arc<AppRegistry>) -> Self {
        let processes = config
            .supervision
            .then(|| Arc::new(ProcessTable::with_pid_base(config.pid_base)));
        Self {
            config,
            registry,
            processes,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<AppRegistry> {
        &self.registry
    }

    pub fn processes(&self) -> Option<&Arc<ProcessTable>> {
        self.processes.as_ref()
    }

    pub fn default_app_id(&self) -> &str {
        &self.config.default_app_id
    }
}
