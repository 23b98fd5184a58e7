//! Demo App - Theme and notification providers
//!
//! Two contexts stacked around a small app:
//! - Theme: light/dark, toggled with Ctrl+T by a key listener the provider owns
//! - Notifications: messages that expire after three seconds
//!
//! Keys:
//! - Enter: toggle the theme from the app and post a notification
//! - Ctrl+T: toggle the theme from the provider's own listener
//! - q / Escape: quit
//!
//! Run with: cargo run --example demo_app
//! Set RUST_LOG=spark_context=debug to see provider lifecycle logs on stderr.

use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use spark_context::{
    component, create_named_context, input, keyboard, mount, on_cleanup, ComponentProps, Signal,
};
use spark_signals::{effect, signal};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq)]
enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Clone)]
struct Theme {
    mode: Signal<ThemeMode>,
}

#[derive(Clone, PartialEq)]
struct Notification {
    message: String,
    posted_at: Instant,
}

#[derive(Clone)]
struct Notifications {
    items: Signal<Vec<Notification>>,
    add: Rc<dyn Fn(String)>,
}

/// Write a line in raw mode.
fn line(text: &str) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    write!(out, "{text}\r\n")?;
    out.flush()
}

/// Write a line from inside an effect, where errors can only be logged.
fn show(text: &str) {
    if let Err(err) = line(text) {
        warn!(%err, "failed to write to terminal");
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Clock the notification provider prunes against
    let now = signal(Instant::now());

    let (theme_provider, use_theme) = create_named_context(
        "Theme",
        || {
            let mode = signal(ThemeMode::Light);
            let mode_for_keys = mode.clone();
            let off = keyboard::on(move |event| {
                if event.modifiers.ctrl && event.code() == "KeyT" {
                    mode_for_keys.set(mode_for_keys.get().toggled());
                    return true;
                }
                false
            });
            on_cleanup(off);
            Theme { mode }
        },
        None,
    );

    let clock = now.clone();
    let (notification_provider, use_notifications) = create_named_context(
        "Notifications",
        move || {
            let items: Signal<Vec<Notification>> = signal(Vec::new());

            let items_for_expiry = items.clone();
            let clock = clock.clone();
            let _expiry = effect(move || {
                let now = clock.get();
                let current = items_for_expiry.get();
                let live: Vec<Notification> = current
                    .iter()
                    .filter(|n| now.duration_since(n.posted_at) < NOTIFICATION_TTL)
                    .cloned()
                    .collect();
                if live.len() != current.len() {
                    items_for_expiry.set(live);
                }
            });

            let items_for_add = items.clone();
            Notifications {
                items,
                add: Rc::new(move |message| {
                    let mut next = items_for_add.get();
                    next.push(Notification {
                        message,
                        posted_at: Instant::now(),
                    });
                    items_for_add.set(next);
                }),
            }
        },
        None,
    );

    enable_raw_mode()?;
    line("createContext demo: Enter toggles theme, Ctrl+T toggles theme, q quits")?;

    let app = mount(move || {
        theme_provider.render(move || {
            notification_provider.render(move || {
                // Theme toggle
                let theme_for_toggle = use_theme.clone();
                let notifications_for_toggle = use_notifications.clone();
                component(ComponentProps::with_children(move || {
                    let theme = theme_for_toggle.use_value();
                    let notifications = notifications_for_toggle.use_value();

                    let mode = theme.mode.clone();
                    let _show = effect(move || {
                        let mode = mode.get();
                        show(&format!("Current: {} (Ctrl + T to toggle)", mode.name()));
                    });

                    let off = keyboard::on_key("Enter", move || {
                        let next = theme.mode.get().toggled();
                        theme.mode.set(next);
                        (notifications.add)(format!("Switched to {} mode", next.name()));
                        true
                    });
                    on_cleanup(off);
                }));

                // Notification list
                component(ComponentProps::with_children(move || {
                    let notifications = use_notifications.use_value();
                    let _list = effect(move || {
                        let items = notifications.items.get();
                        if items.is_empty() {
                            show("  (no notifications)");
                        }
                        for item in &items {
                            show(&format!("  * {}", item.message));
                        }
                    });
                }));
            });
        });
    });

    let result = run(&now);

    app.unmount();
    disable_raw_mode()?;
    result
}

fn run(now: &Signal<Instant>) -> std::io::Result<()> {
    loop {
        let event = input::pump(Duration::from_millis(100))?;
        if let Some(event) = event {
            if event.key == "q" || event.key == "Escape" {
                return Ok(());
            }
        }
        now.set(Instant::now());
    }
}
