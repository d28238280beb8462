//! Battery readings from `/sys/class/power_supply`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lintel_area::widgets::{BatteryState, ChargeStatus};
use tracing::trace;

fn read_trimmed(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
}

fn read_number(dir: &Path, name: &str) -> Option<u64> {
    read_trimmed(dir, name)?.parse().ok()
}

/// First `BAT*` supply under `root`, in name order.
pub fn find_battery(root: &Path) -> Option<PathBuf> {
    let mut batteries: Vec<PathBuf> = fs::read_dir(root)
        .ok()?
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("BAT"))
        .map(|e| e.path())
        .collect();
    batteries.sort();
    batteries.into_iter().next()
}

/// Energy (or charge) now and full, and the power (or current) draw.
/// Drivers report either the energy triple or the charge triple.
fn levels(dir: &Path) -> Option<(u64, u64, u64)> {
    let triple = |now: &str, full: &str, rate: &str| {
        Some((
            read_number(dir, now)?,
            read_number(dir, full)?,
            read_number(dir, rate).unwrap_or(0),
        ))
    };
    triple("energy_now", "energy_full", "power_now")
        .or_else(|| triple("charge_now", "charge_full", "current_now"))
}

/// Read one battery directory.
pub fn read_state(dir: &Path) -> Option<BatteryState> {
    let status = ChargeStatus::from_sysfs(&read_trimmed(dir, "status").unwrap_or_default());
    let levels = levels(dir);

    let percentage = match read_number(dir, "capacity") {
        Some(pct) => pct.min(100) as u8,
        None => {
            let (now, full, _) = levels?;
            if full == 0 {
                return None;
            }
            (now * 100 / full).min(100) as u8
        }
    };

    let time_left = levels.and_then(|(now, full, rate)| {
        if rate == 0 {
            return None;
        }
        let remaining = match status {
            ChargeStatus::Discharging => now,
            ChargeStatus::Charging => full.saturating_sub(now),
            _ => return None,
        };
        Some(Duration::from_secs(remaining * 3600 / rate))
    });

    trace!("battery read from {}: {}% {:?}", dir.display(), percentage, status);
    Some(BatteryState {
        percentage,
        status,
        time_left,
    })
}

/// Read the first battery under `root`, if any.
pub fn read_battery(root: &Path) -> Option<BatteryState> {
    read_state(&find_battery(root)?)
}
