use std::sync::Arc;

use dashboard_core::{ActionFailure, Effect, Msg};
use engine_logging::{engine_info, engine_warn};
use futures_util::future::join;
use tokio::sync::mpsc::UnboundedSender;

use crate::{DashboardApi, TimerRegistry};

/// Executes effects from `update` and reports completions as `Msg`s.
///
/// Every network effect runs as its own task; ordering between requests is
/// the state machine's job, not the runner's.
pub struct EffectRunner {
    api: Arc<dyn DashboardApi>,
    tx: UnboundedSender<Msg>,
    timers: TimerRegistry,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn DashboardApi>, tx: UnboundedSender<Msg>) -> Self {
        Self {
            api,
            tx,
            timers: TimerRegistry::new(),
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_one(effect);
        }
    }

    fn run_one(&mut self, effect: Effect) {
        match effect {
            Effect::StartTimer { key, after } => {
                self.timers.start(key, after, self.tx.clone());
            }
            Effect::CancelTimer { key } => self.timers.cancel(key),
            Effect::PollCycle {
                limit,
                include_redo,
            } => {
                self.spawn(move |api| async move {
                    let messages = api.list_messages(limit, None);
                    let redo = async {
                        if include_redo {
                            Some(api.list_redo_commands().await.map_err(ActionFailure::from))
                        } else {
                            None
                        }
                    };
                    let (messages, redo) = join(messages, redo).await;
                    Msg::PollCompleted {
                        messages: messages.map_err(ActionFailure::from),
                        redo,
                    }
                });
            }
            Effect::LoadConfig => {
                self.spawn(|api| async move {
                    Msg::ConfigLoaded(api.get_config().await.map_err(log_failure("load config")))
                });
            }
            Effect::SaveConfig(config) => {
                engine_info!("Saving configuration ({} directories)", config.directories.len());
                self.spawn(move |api| async move {
                    Msg::ConfigSaved(
                        api.save_config(&config)
                            .await
                            .map_err(log_failure("save config")),
                    )
                });
            }
            Effect::ToggleMonitor { enabled } => {
                self.spawn(move |api| async move {
                    Msg::MonitorToggleSettled(
                        api.toggle_monitor(enabled)
                            .await
                            .map_err(log_failure("toggle monitor")),
                    )
                });
            }
            Effect::RunBatch(request) => {
                let mode = request.mode;
                self.spawn(move |api| async move {
                    Msg::BatchFinished {
                        mode,
                        result: api
                            .run_batch(&request)
                            .await
                            .map_err(log_failure("run batch")),
                    }
                });
            }
            Effect::ClearMessages { kind } => {
                self.spawn(move |api| async move {
                    Msg::MessagesCleared(
                        api.clear_messages(kind)
                            .await
                            .map_err(log_failure("clear messages")),
                    )
                });
            }
            Effect::FetchRedoCommands => {
                self.spawn(|api| async move {
                    Msg::RedoCommandsLoaded(
                        api.list_redo_commands()
                            .await
                            .map_err(log_failure("list redo commands")),
                    )
                });
            }
            Effect::ExecuteRedo { id } => {
                engine_info!("Executing redo command {}", id);
                self.spawn(move |api| async move {
                    Msg::RedoExecuted {
                        id,
                        result: api
                            .execute_redo(id)
                            .await
                            .map_err(log_failure("execute redo")),
                    }
                });
            }
        }
    }

    fn spawn<F, Fut>(&self, job: F)
    where
        F: FnOnce(Arc<dyn DashboardApi>) -> Fut,
        Fut: std::future::Future<Output = Msg> + Send + 'static,
    {
        let future = job(self.api.clone());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(future.await);
        });
    }
}

fn log_failure(action: &'static str) -> impl Fn(crate::ApiError) -> ActionFailure {
    move |err| {
        engine_warn!("{} failed: {}", action, err);
        ActionFailure::from(err)
    }
}
