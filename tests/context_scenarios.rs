//! End-to-end context scenarios: providers whose values own state, effects,
//! and key listeners, consumed by components further down the tree.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_context::{
    component, create_context, create_named_context, get_allocated_count, keyboard, mount,
    on_cleanup, reset_registry, with_parent_context, Accessor, ComponentProps, KeyboardEvent,
    Modifiers, Provider, Signal,
};
use spark_signals::{effect, signal};

fn setup() {
    reset_registry();
    keyboard::reset_keyboard_state();
}

// =============================================================================
// Basic values
// =============================================================================

#[test]
fn simple_value_reaches_consumer() {
    setup();
    let (provider, use_greeting) = create_context(|| "Hello, world!".to_string(), None);

    let text = Rc::new(RefCell::new(String::new()));
    let text_clone = text.clone();

    let app = mount(move || {
        provider.render(move || {
            component(ComponentProps::with_children(move || {
                *text_clone.borrow_mut() = use_greeting.use_value();
            }));
        });
    });

    assert_eq!(*text.borrow(), "Hello, world!");

    app.unmount();
    assert_eq!(get_allocated_count(), 0);
}

#[test]
fn consumer_outside_provider_fails() {
    setup();
    let (_provider, use_test) = create_context(|| "test", None);

    let outcome = Rc::new(RefCell::new(None));
    let outcome_clone = outcome.clone();

    let app = mount(move || {
        component(ComponentProps::with_children(move || {
            *outcome_clone.borrow_mut() = Some(use_test.try_use());
        }));
    });

    let err = outcome.borrow_mut().take().unwrap().unwrap_err();
    assert!(err.to_string().contains("Provider"));

    app.unmount();
    assert_eq!(get_allocated_count(), 0);
}

#[test]
#[should_panic(expected = "`Greeting` accessor must be used within its Provider")]
fn use_value_outside_provider_panics_even_with_default() {
    setup();
    let (_provider, use_greeting) =
        create_named_context("Greeting", || "hi", Some("default greeting"));

    mount(move || {
        use_greeting.use_value();
    });
}

#[test]
fn accessor_fails_again_after_unmount() {
    setup();
    let (provider, use_value) = create_context(|| 5_u32, None);

    let accessor = use_value.clone();
    let app = mount(move || {
        provider.render(move || {
            assert_eq!(use_value.use_value(), 5);
        });
    });

    let root = app.root().unwrap();
    app.unmount();

    let after = with_parent_context(root, || accessor.try_use());
    assert!(after.is_err());
    assert_eq!(get_allocated_count(), 0);
}

#[test]
fn failed_render_removes_provider_listener() {
    setup();
    let (provider, _use_hotkeys) = hotkey_context();
    let (_other_provider, use_other) = create_named_context("Other", || 1, None);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        mount(move || {
            provider.render(move || {
                use_other.use_value();
            });
        })
    }));

    assert!(result.is_err());
    assert_eq!(get_allocated_count(), 0);
    assert_eq!(keyboard::handler_count(), 0);
}

// =============================================================================
// State inside the provider value
// =============================================================================

#[derive(Clone)]
struct Count {
    count: Signal<i32>,
    set_count: Rc<dyn Fn(i32)>,
}

fn count_context() -> (Provider<Count>, Accessor<Count>) {
    create_context(
        || {
            let count = signal(0);
            let count_for_set = count.clone();
            Count {
                count,
                set_count: Rc::new(move |n| {
                    count_for_set.set(n);
                }),
            }
        },
        None,
    )
}

#[test]
fn increment_from_descendant_updates_readers() {
    setup();
    let (provider, use_count) = count_context();

    let shown = Rc::new(Cell::new(-1));
    let shown_clone = shown.clone();
    let button: Rc<RefCell<Option<Count>>> = Rc::new(RefCell::new(None));
    let button_clone = button.clone();

    let app = mount(move || {
        provider.render(move || {
            component(ComponentProps::with_children(move || {
                let ctx = use_count.use_value();
                let count = ctx.count.clone();
                let _effect = effect(move || shown_clone.set(count.get()));
                *button_clone.borrow_mut() = Some(ctx);
            }));
        });
    });

    assert_eq!(shown.get(), 0);

    // "click": setCount(count + 1)
    let ctx = button.borrow().clone().unwrap();
    (ctx.set_count)(ctx.count.get() + 1);

    assert_eq!(shown.get(), 1);

    app.unmount();
    assert_eq!(get_allocated_count(), 0);
}

#[test]
fn providers_from_different_factories_do_not_share_state() {
    setup();
    let (left_provider, use_left) = count_context();
    let (right_provider, use_right) = count_context();

    let left: Rc<RefCell<Option<Count>>> = Rc::new(RefCell::new(None));
    let right: Rc<RefCell<Option<Count>>> = Rc::new(RefCell::new(None));
    let left_clone = left.clone();
    let right_clone = right.clone();

    let app = mount(move || {
        left_provider.render(move || {
            *left_clone.borrow_mut() = use_left.try_use().ok();
        });
        right_provider.render(move || {
            *right_clone.borrow_mut() = use_right.try_use().ok();
        });
    });

    let left = left.borrow().clone().unwrap();
    let right = right.borrow().clone().unwrap();

    (left.set_count)(10);
    assert_eq!(left.count.get(), 10);
    assert_eq!(right.count.get(), 0);

    app.unmount();
    assert_eq!(get_allocated_count(), 0);
}

// =============================================================================
// Effects and key listeners inside the provider value
// =============================================================================

#[derive(Clone)]
struct Hotkeys {
    pressed: Signal<Option<String>>,
}

fn hotkey_context() -> (Provider<Hotkeys>, Accessor<Hotkeys>) {
    create_named_context(
        "Hotkeys",
        || {
            let pressed = signal(None::<String>);
            let pressed_for_keys = pressed.clone();
            let off = keyboard::on(move |event| {
                pressed_for_keys.set(Some(event.code()));
                false
            });
            on_cleanup(off);
            Hotkeys { pressed }
        },
        None,
    )
}

#[test]
fn key_listener_registered_by_provider_updates_consumer() {
    setup();
    let (provider, use_hotkeys) = hotkey_context();

    let display = Rc::new(RefCell::new(String::new()));
    let display_clone = display.clone();

    let app = mount(move || {
        provider.render(move || {
            let hotkeys = use_hotkeys.use_value();
            let _effect = effect(move || {
                let text = hotkeys.pressed.get().unwrap_or_else(|| "none".to_string());
                *display_clone.borrow_mut() = text;
            });
        });
    });

    assert_eq!(*display.borrow(), "none");

    keyboard::dispatch(KeyboardEvent::new("a"));
    assert_eq!(*display.borrow(), "KeyA");

    app.unmount();
    assert_eq!(keyboard::handler_count(), 0);
}

#[test]
fn key_listener_removed_on_unmount() {
    setup();
    let (provider, _use_hotkeys) = hotkey_context();

    let app = mount(move || {
        provider.render(|| {});
    });
    assert_eq!(keyboard::handler_count(), 1);

    app.unmount();
    assert_eq!(keyboard::handler_count(), 0);
    assert_eq!(get_allocated_count(), 0);
}

// =============================================================================
// Game hotkeys
// =============================================================================

const WEAPONS: [&str; 3] = ["Sword", "Bow", "Magic Staff"];

#[derive(Clone)]
struct Game {
    current_weapon: Signal<usize>,
    combo: Signal<Vec<String>>,
    clear_combo: Rc<dyn Fn()>,
}

impl Game {
    fn weapon_name(&self) -> &'static str {
        WEAPONS[self.current_weapon.get()]
    }
}

fn game_context() -> (Provider<Game>, Accessor<Game>) {
    create_named_context(
        "GameHotkeys",
        || {
            let current_weapon = signal(0_usize);
            let combo = signal(Vec::<String>::new());

            let weapon_for_keys = current_weapon.clone();
            let combo_for_keys = combo.clone();
            let off = keyboard::on(move |event| {
                match event.code().as_str() {
                    "Digit1" => {
                        weapon_for_keys.set(0);
                    }
                    "Digit2" => {
                        weapon_for_keys.set(1);
                    }
                    "Digit3" => {
                        weapon_for_keys.set(2);
                    }
                    "Space" => {
                        let mut next = combo_for_keys.get();
                        next.push("attack".to_string());
                        combo_for_keys.set(next);
                    }
                    _ => return false,
                }
                true
            });
            on_cleanup(off);

            let combo_for_clear = combo.clone();
            Game {
                current_weapon,
                combo,
                clear_combo: Rc::new(move || {
                    combo_for_clear.set(Vec::new());
                }),
            }
        },
        None,
    )
}

#[test]
fn number_keys_switch_weapons() {
    setup();
    let (provider, use_game) = game_context();

    let weapon = Rc::new(RefCell::new(String::new()));
    let weapon_clone = weapon.clone();

    let app = mount(move || {
        provider.render(move || {
            let game = use_game.use_value();
            let _effect = effect(move || {
                *weapon_clone.borrow_mut() = format!("Current Weapon: {}", game.weapon_name());
            });
        });
    });

    assert_eq!(*weapon.borrow(), "Current Weapon: Sword");

    keyboard::dispatch(KeyboardEvent::new("2"));
    assert_eq!(*weapon.borrow(), "Current Weapon: Bow");

    keyboard::dispatch(KeyboardEvent::new("3"));
    assert_eq!(*weapon.borrow(), "Current Weapon: Magic Staff");

    app.unmount();
    assert_eq!(keyboard::handler_count(), 0);
}

#[test]
fn space_builds_combo_and_clear_resets_it() {
    setup();
    let (provider, use_game) = game_context();

    let combo_len = Rc::new(Cell::new(usize::MAX));
    let combo_len_clone = combo_len.clone();
    let game_slot: Rc<RefCell<Option<Game>>> = Rc::new(RefCell::new(None));
    let game_slot_clone = game_slot.clone();

    let app = mount(move || {
        provider.render(move || {
            let game = use_game.use_value();
            let combo = game.combo.clone();
            let _effect = effect(move || combo_len_clone.set(combo.get().len()));
            *game_slot_clone.borrow_mut() = Some(game);
        });
    });

    assert_eq!(combo_len.get(), 0);

    keyboard::dispatch(KeyboardEvent::new(" "));
    keyboard::dispatch(KeyboardEvent::new(" "));
    assert_eq!(combo_len.get(), 2);

    let game = game_slot.borrow().clone().unwrap();
    (game.clear_combo)();
    assert_eq!(combo_len.get(), 0);

    app.unmount();
    assert_eq!(get_allocated_count(), 0);
}

// =============================================================================
// Stacked providers (theme + notifications)
// =============================================================================

#[derive(Clone)]
struct Theme {
    dark: Signal<bool>,
}

#[derive(Clone)]
struct Notifications {
    items: Signal<Vec<String>>,
}

#[test]
fn consumer_reads_two_stacked_providers() {
    setup();
    let (theme_provider, use_theme) = create_context(
        || {
            let dark = signal(false);
            let dark_for_keys = dark.clone();
            let off = keyboard::on(move |event| {
                if event.modifiers.ctrl && event.code() == "KeyT" {
                    dark_for_keys.set(!dark_for_keys.get());
                    return true;
                }
                false
            });
            on_cleanup(off);
            Theme { dark }
        },
        None,
    );
    let (notification_provider, use_notifications) = create_context(
        || Notifications {
            items: signal(Vec::new()),
        },
        None,
    );

    let label = Rc::new(RefCell::new(String::new()));
    let label_clone = label.clone();
    let notes: Rc<RefCell<Option<Notifications>>> = Rc::new(RefCell::new(None));
    let notes_clone = notes.clone();
    let toggle: Rc<RefCell<Option<Rc<dyn Fn()>>>> = Rc::new(RefCell::new(None));
    let toggle_clone = toggle.clone();

    let app = mount(move || {
        theme_provider.render(move || {
            notification_provider.render(move || {
                let theme = use_theme.use_value();
                let notifications = use_notifications.use_value();

                let dark = theme.dark.clone();
                let _effect = effect(move || {
                    let mode = if dark.get() { "dark" } else { "light" };
                    *label_clone.borrow_mut() = mode.to_string();
                });

                let items = notifications.items.clone();
                *toggle_clone.borrow_mut() = Some(Rc::new(move || {
                    let next_dark = !theme.dark.get();
                    theme.dark.set(next_dark);
                    let mode = if next_dark { "dark" } else { "light" };
                    let mut next = items.get();
                    next.push(format!("Switched to {mode} mode"));
                    items.set(next);
                }));
                *notes_clone.borrow_mut() = Some(notifications);
            });
        });
    });

    assert_eq!(*label.borrow(), "light");

    let toggle = toggle.borrow().clone().unwrap();
    toggle();
    assert_eq!(*label.borrow(), "dark");

    keyboard::dispatch(KeyboardEvent::with_modifiers("t", Modifiers::ctrl()));
    assert_eq!(*label.borrow(), "light");

    let items = notes.borrow().clone().unwrap().items.get();
    assert_eq!(items, vec!["Switched to dark mode".to_string()]);

    app.unmount();
    assert_eq!(keyboard::handler_count(), 0);
    assert_eq!(get_allocated_count(), 0);
}
