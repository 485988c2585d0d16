use iced::{
    time,
    widget::{button, canvas::Canvas, column, row, scrollable, text, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use radar_canvas::RadarCanvas;
use radarcore::capture::CaptureSummary;
use radarcore::feedback::classify::{object_name, Compass, RangeBand};
use radarcore::math::StatsHelper;
use radarcore::{Command, SessionSnapshot};
use serde::Serialize;
use std::{path::PathBuf, time::Duration};

mod radar_canvas;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";
const CAPTURE_DIR: &str = "captures";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Sweep Radar".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(100)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    snapshot: Option<SessionSnapshot>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    StateFetched(Result<SessionSnapshot, String>),
    Send(Command),
    CommandSent(Result<String, String>),
    Capture,
    Download(CaptureSummary),
    Delete(String),
    ClearCaptures,
    CapturesChanged(Result<String, String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                snapshot: None,
                status: "Waiting for the bridge...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_state(), Message::StateFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_state(), Message::StateFetched),
            Message::StateFetched(Ok(snapshot)) => {
                state.snapshot = Some(snapshot);
                Task::none()
            }
            Message::StateFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::Send(command) => Task::perform(post_command(command), Message::CommandSent),
            Message::Capture => Task::perform(capture_now(), Message::CapturesChanged),
            Message::Download(summary) => {
                Task::perform(download_capture(summary), Message::CapturesChanged)
            }
            Message::Delete(id) => Task::perform(delete_capture(id), Message::CapturesChanged),
            Message::ClearCaptures => Task::perform(clear_captures(), Message::CapturesChanged),
            Message::CommandSent(Ok(note)) | Message::CapturesChanged(Ok(note)) => {
                state.status = note.clone();
                state.push_history(note);
                Task::perform(fetch_state(), Message::StateFetched)
            }
            Message::CommandSent(Err(err)) | Message::CapturesChanged(Err(err)) => {
                state.status = format!("Request failed: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let snapshot = state.snapshot.as_ref();

        let radar = Canvas::new(RadarCanvas { snapshot })
            .width(Length::Fill)
            .height(Length::Fixed(420.0));

        let radar_column = column![
            text("Sweep").size(26),
            radar,
            control_panel(snapshot),
            text(&state.status).size(14),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::FillPortion(3));

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let side_column = column![
            data_panel(snapshot),
            capture_panel(snapshot),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::FillPortion(2));

        let layout = row![radar_column, side_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(scrollable(layout))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn toggle_label(name: &str, enabled: bool) -> String {
    format!("{name}: {}", if enabled { "ON" } else { "OFF" })
}

fn control_panel(snapshot: Option<&SessionSnapshot>) -> Element<'_, Message> {
    let scanning = snapshot.map_or(false, SessionSnapshot::is_scanning);
    let (beep, alerts, tracking) = snapshot.map_or((false, false, false), |s| {
        (s.beep_enabled, s.alerts_enabled, s.tracking_enabled)
    });
    let sweep_button = if scanning {
        button("Stop scan").on_press(Message::Send(Command::Stop))
    } else {
        button("Start scan").on_press(Message::Send(Command::Start))
    };
    let angle = snapshot.map_or(0.0, |s| s.angle_deg);

    column![
        row![
            sweep_button.padding(10),
            button(text(toggle_label("Beep", beep)))
                .on_press(Message::Send(Command::ToggleBeep))
                .padding(10),
            button(text(toggle_label("Alerts", alerts)))
                .on_press(Message::Send(Command::ToggleAlerts))
                .padding(10),
            button(text(toggle_label("Tracking", tracking)))
                .on_press(Message::Send(Command::ToggleTracking))
                .padding(10),
        ]
        .spacing(8),
        text(format!(
            "{} | sweep {:.0}°",
            if scanning { "SCANNING" } else { "IDLE" },
            angle
        ))
        .size(14),
    ]
    .spacing(8)
    .into()
}

fn data_panel(snapshot: Option<&SessionSnapshot>) -> Element<'_, Message> {
    let Some(snapshot) = snapshot else {
        return column![text("Targets").size(22), text("No data").size(12)].into();
    };

    let format_cm = |value: Option<f32>| value.map_or("-".to_string(), |v| format!("{v:.0} cm"));
    let stats = text(format!(
        "Objects {} | readings {} | closest {} | mean {}",
        snapshot.objects.len(),
        snapshot.readings.len(),
        format_cm(snapshot.closest_cm),
        format_cm(snapshot.mean_cm)
    ))
    .size(14);

    let objects = StatsHelper::recent_objects(&snapshot.objects, 8)
        .iter()
        .rev()
        .fold(Column::new().spacing(2), |col, object| {
            col.push(
                text(format!(
                    "{} {} @ {:.0}° / {:.0} cm{}",
                    object_name(object.angle_deg, object.distance_cm),
                    Compass::from_angle(object.angle_deg).as_str(),
                    object.angle_deg,
                    object.distance_cm,
                    if object.tracked { " [tracked]" } else { "" }
                ))
                .size(12),
            )
        });

    let readings = StatsHelper::recent_readings(&snapshot.readings, 10)
        .into_iter()
        .fold(Column::new().spacing(2), |col, reading| {
            col.push(
                text(format!(
                    "{:>5.0}° {:>5.0} cm {}",
                    reading.angle_deg,
                    reading.distance_cm,
                    RangeBand::from_distance(reading.distance_cm).as_str()
                ))
                .size(12),
            )
        });

    let spoken = snapshot
        .spoken
        .iter()
        .rev()
        .take(5)
        .fold(Column::new().spacing(2), |col, line| {
            col.push(text(line.clone()).size(12))
        });

    column![
        text("Targets").size(22),
        stats,
        text("Detected objects").size(16),
        objects,
        text("Latest readings").size(16),
        readings,
        text(format!(
            "Voice ({})",
            if snapshot.voice_primary { "primary" } else { "local" }
        ))
        .size(16),
        spoken,
    ]
    .spacing(6)
    .into()
}

fn capture_panel(snapshot: Option<&SessionSnapshot>) -> Element<'_, Message> {
    let captures = snapshot.map(|s| s.captures.as_slice()).unwrap_or_default();
    let list = if captures.is_empty() {
        Column::new().push(text("No captures yet").size(12))
    } else {
        captures
            .iter()
            .rev()
            .fold(Column::new().spacing(4), |col, summary| {
                col.push(
                    row![
                        text(summary.name.clone()).size(12).width(Length::Fill),
                        button(text("Save").size(12))
                            .on_press(Message::Download(summary.clone()))
                            .padding(4),
                        button(text("Delete").size(12))
                            .on_press(Message::Delete(summary.id.clone()))
                            .padding(4),
                    ]
                    .spacing(6)
                    .align_y(Alignment::Center),
                )
            })
    };

    column![
        text(format!("Captures ({})", captures.len())).size(22),
        row![
            button("Capture").on_press(Message::Capture).padding(8),
            button("Clear all").on_press(Message::ClearCaptures).padding(8),
        ]
        .spacing(8),
        Container::new(scrollable(list).height(Length::Fixed(160.0))).padding(6),
    ]
    .spacing(8)
    .into()
}

#[derive(Debug, Serialize)]
struct CommandBody {
    command: Command,
}

async fn fetch_state() -> Result<SessionSnapshot, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/state"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<SessionSnapshot>()
        .await
        .map_err(|e| e.to_string())
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, String> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

async fn post_command(command: Command) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/command"))
        .json(&CommandBody { command })
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(response).await?;
    Ok(format!("Sent {:?}", command))
}

async fn capture_now() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/captures"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let reply: serde_json::Value = check(response)
        .await?
        .json()
        .await
        .map_err(|e| e.to_string())?;
    Ok(match reply["capture"]["name"].as_str() {
        Some(name) => format!("Captured {name}"),
        None => "No valid targets to capture".into(),
    })
}

async fn download_capture(summary: CaptureSummary) -> Result<String, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/captures/{}", summary.id))
        .await
        .map_err(|e| e.to_string())?;
    let bytes = check(response)
        .await?
        .bytes()
        .await
        .map_err(|e| e.to_string())?;
    let path = PathBuf::from(CAPTURE_DIR).join(format!("{}.png", summary.name));
    tokio::fs::create_dir_all(CAPTURE_DIR)
        .await
        .map_err(|e| e.to_string())?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| e.to_string())?;
    Ok(format!("Saved {}", path.display()))
}

async fn delete_capture(id: String) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .delete(format!("{BRIDGE_URL}/captures/{id}"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(response).await?;
    Ok(format!("Deleted {id}"))
}

async fn clear_captures() -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .delete(format!("{BRIDGE_URL}/captures"))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    check(response).await?;
    Ok("Cleared captures".into())
}
