use crate::gui_bridge::model::{CaptureReply, CommandReply, CommandRequest, StatusReply};
use crate::workflow::events::EventSink;
use log::{error, info, warn};
use radarcore::capture::CaptureSummary;
use radarcore::{Command, Session, SessionEvent, SessionSnapshot};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread,
    time::{Duration, Instant},
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{self, Response},
    Filter, Reply,
};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Session shared by the HTTP handlers and the sweep ticker.
pub struct BridgeState {
    session: Mutex<Session>,
    started: Instant,
    sink: EventSink,
}

impl BridgeState {
    fn new(session: Session, sink: EventSink) -> Self {
        Self {
            session: Mutex::new(session),
            started: Instant::now(),
            sink,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Milliseconds since the bridge came up; the session clock.
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Runs `step` under the session lock, then feeds its events to the sink
    /// once the lock is released.
    fn step<T>(&self, step: impl FnOnce(&mut Session, u64) -> (Vec<SessionEvent>, T)) -> T {
        let now = self.now_ms();
        let (events, value) = {
            let mut session = self.lock();
            step(&mut session, now)
        };
        self.sink.handle(&events);
        value
    }

    fn tick(&self) {
        self.step(|session, now| (session.advance(now), ()));
    }

    fn apply(&self, command: Command) -> CommandReply {
        let snapshot = self.step(|session, now| {
            let events = session.command(command, now);
            (events, session.snapshot())
        });
        CommandReply {
            status: "ok".into(),
            mode: snapshot.mode,
            beep_enabled: snapshot.beep_enabled,
            alerts_enabled: snapshot.alerts_enabled,
            tracking_enabled: snapshot.tracking_enabled,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.step(|session, now| {
            let events = session.advance(now);
            (events, session.snapshot())
        })
    }

    fn summaries(&self) -> Vec<CaptureSummary> {
        self.lock().captures().summaries()
    }

    fn manual_capture(&self) -> CaptureReply {
        let now = self.now_ms();
        match self.lock().manual_capture(now) {
            Some(summary) => {
                info!("manual capture {}", summary.name);
                CaptureReply {
                    status: "captured".into(),
                    capture: Some(summary),
                }
            }
            None => CaptureReply {
                status: "no_targets".into(),
                capture: None,
            },
        }
    }

    fn download(&self, id: &str) -> Response {
        let encoded = self
            .lock()
            .captures()
            .get(id)
            .map(|image| (image.file_name(), image.to_png()));
        match encoded {
            Some((file_name, Ok(bytes))) => {
                let png = reply::with_header(bytes, "content-type", "image/png");
                reply::with_header(
                    png,
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", file_name),
                )
                .into_response()
            }
            Some((_, Err(err))) => {
                error!("encoding capture {} failed: {}", id, err);
                reply::with_status(
                    reply::json(&StatusReply::error(err.to_string())),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .into_response()
            }
            None => not_found(id),
        }
    }

    fn delete(&self, id: &str) -> Response {
        if self.lock().captures_mut().delete(id) {
            reply::json(&StatusReply::ok()).into_response()
        } else {
            not_found(id)
        }
    }

    fn clear(&self) -> StatusReply {
        self.lock().captures_mut().clear();
        StatusReply::ok()
    }
}

fn not_found(id: &str) -> Response {
    reply::with_status(
        reply::json(&StatusReply::error(format!("no capture {}", id))),
        StatusCode::NOT_FOUND,
    )
    .into_response()
}

/// HTTP bridge between a live session and the visualizer.
pub struct GuiBridge {
    state: Arc<BridgeState>,
    tick_period: Duration,
}

impl GuiBridge {
    pub fn new(session: Session, sink: EventSink) -> Self {
        let tick_period = Duration::from_millis(session.config().scan_period_ms.max(1));
        Self {
            state: Arc::new(BridgeState::new(session, sink)),
            tick_period,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let get_state = warp::path!("state")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<BridgeState>| reply::json(&state.snapshot()));

        let post_command = warp::path!("command")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .map(|request: CommandRequest, state: Arc<BridgeState>| {
                reply::json(&state.apply(request.command))
            });

        let list_captures = warp::path!("captures")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<BridgeState>| reply::json(&state.summaries()));

        let manual_capture = warp::path!("captures")
            .and(warp::post())
            .and(state_filter.clone())
            .map(|state: Arc<BridgeState>| reply::json(&state.manual_capture()));

        let download = warp::path!("captures" / String)
            .and(warp::get())
            .and(state_filter.clone())
            .map(|id: String, state: Arc<BridgeState>| state.download(&id));

        let delete_one = warp::path!("captures" / String)
            .and(warp::delete())
            .and(state_filter.clone())
            .map(|id: String, state: Arc<BridgeState>| state.delete(&id));

        let clear = warp::path!("captures")
            .and(warp::delete())
            .and(state_filter)
            .map(|state: Arc<BridgeState>| reply::json(&state.clear()));

        get_state
            .or(post_command)
            .or(list_captures)
            .or(manual_capture)
            .or(download)
            .or(delete_one)
            .or(clear)
    }

    /// Starts the sweep ticker and HTTP server on a background runtime.
    pub fn spawn(&self, addr: SocketAddr) -> thread::JoinHandle<()> {
        let routes = self.routes();
        let state = self.state.clone();
        let tick_period = self.tick_period;
        thread::spawn(move || {
            let runtime = match Builder::new_multi_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(tick_period);
                    loop {
                        interval.tick().await;
                        state.tick();
                    }
                });
                match warp::serve(routes).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        info!("bridge listening on http://{}", bound);
                        server.await;
                    }
                    Err(err) => warn!("bridge could not bind {}: {}", addr, err),
                }
            });
        })
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }
}
