//! The demo capability set: a software rendition of the classic buzzer
//! firmware — `run buzz`, `run print`, and a settable/readable duration.
//!
//! Real firmware supplies its own [`Capabilities`]; this one exists so a
//! daemon started with no hardware still has something to say.

use std::sync::{Arc, Mutex};

use tracing::info;

use crosstalk_core::Capabilities;

const DEFAULT_DURATION_SECS: f64 = 0.5;

/// Build the demo capabilities. `description` is what `talk` returns.
pub fn capabilities(description: String, platform: String) -> Capabilities {
    let duration = Arc::new(Mutex::new(DEFAULT_DURATION_SECS));

    let buzz_duration = Arc::clone(&duration);
    let print_duration = Arc::clone(&duration);
    let set_duration = Arc::clone(&duration);
    let get_duration = Arc::clone(&duration);

    Capabilities::builder(description, platform)
        .run("buzz", "Triggers a buzzing sound", move || {
            let secs = read(&buzz_duration);
            // The ack does not wait for the buzzer; fire and forget.
            info!(secs, "BZZZZ");
            print!("\x07");
        })
        .run("print", "Prints the duration on the device", move || {
            println!("\t{}", read(&print_duration));
        })
        .set("duration", "Sets the buzz duration in seconds", move |raw| {
            let secs: f64 = raw
                .parse()
                .map_err(|_| format!("'{raw}' is not a number"))?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(format!("'{raw}' is not a positive duration"));
            }
            if let Ok(mut guard) = set_duration.lock() {
                *guard = secs;
            }
            Ok(())
        })
        .get("duration", "Gets the buzz duration in seconds", move || {
            read(&get_duration).to_string()
        })
        .build()
}

fn read(duration: &Mutex<f64>) -> f64 {
    duration.lock().map_or(DEFAULT_DURATION_SECS, |guard| *guard)
}
