use std::f64::consts::PI;

use crate::console::Console;
use crate::errors::{GeometryError, InputError};

pub fn area(radius: f64) -> Result<f64, GeometryError> {
    if !radius.is_finite() {
        return Err(GeometryError::NotFinite);
    }
    if radius < 0.0 {
        return Err(GeometryError::NegativeRadius);
    }
    Ok(PI * radius * radius)
}

/// Ask for a radius until a valid one is given or `max_attempts` run out.
/// Returns `Ok(None)` when every attempt was rejected.
pub fn prompt_area(console: &mut dyn Console, max_attempts: u32) -> Result<Option<f64>, InputError> {
    for attempt in 1..=max_attempts {
        let input = console.read_line(&format!(
            "[attempt {}/{}] Enter the radius of the circle: ",
            attempt, max_attempts
        ))?;

        let result = match input.trim().parse::<f64>() {
            Ok(radius) => area(radius).map(|area| (radius, area)),
            Err(_) => {
                console.write_line(&format!("❌ '{}' is not a number", input.trim()));
                continue;
            }
        };

        match result {
            Ok((radius, area)) => {
                console.write_line(&format!(
                    "✅ The area of a circle with radius {} is {:.2}",
                    radius, area
                ));
                return Ok(Some(area));
            }
            Err(e) => console.write_line(&format!("❌ {}", e)),
        }
    }

    console.write_line("❌ Too many invalid attempts.");
    Ok(None)
}
