//! Settings store.
//!
//! Holds the authoritative settings snapshot and applies merge-updates to it:
//! saturation back-fill for base colors, merge, persist, then optional CSS
//! regeneration. Updates to one store are serialized by a mutex.

use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

use super::{CssGenerator, SettingsPersistence};
use crate::color::{self, is_non_derivable};
use crate::error::{InvalidInputReason, TokenError, TokenResult};
use crate::expansions::ExpansionTable;
use crate::models::{ColorModifier, SettingsSnapshot};

/// Prefix of base color setting keys.
const BASE_COLOR_PREFIX: &str = "color-";

/// Options for [`SettingsStore::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Run the CSS generator after a change was saved
    pub regenerate: bool,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self { regenerate: true }
    }
}

/// Outcome of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Snapshot after the merge
    pub saved: SettingsSnapshot,
    /// False if the merge left the snapshot as it was
    pub changed: bool,
    /// Files written by the CSS generator (0 when it did not run)
    pub generated_count: usize,
}

/// Returns the color name of a base color key (`color-primary` -> `primary`).
///
/// Keys naming a tonal variant (`color-primary-dark`) or a component
/// (`color-primary-h`) are not base colors. This goes by suffix alone, so a
/// color literally named `text-light` is read as the `light` variant of
/// `text` and gets no saturation back-fill.
#[must_use]
pub fn base_color_name(key: &str) -> Option<&str> {
    let name = key.strip_prefix(BASE_COLOR_PREFIX)?;
    if name.is_empty() {
        return None;
    }

    let is_component = ["-h", "-s", "-l"]
        .iter()
        .any(|suffix| name.ends_with(suffix));
    let is_variant = ColorModifier::ALL.iter().any(|modifier| {
        name.strip_suffix(modifier.as_str())
            .is_some_and(|rest| rest.ends_with('-'))
    });

    (!is_component && !is_variant).then_some(name)
}

/// Adds the derived saturation for every modifier of every base color in
/// `entries` that `entries` does not set explicitly.
///
/// Values with no derivable color (`transparent`, `var(...)`, ...) are
/// skipped; any other unparsable color fails with
/// [`TokenError::InvalidColor`] naming its key.
///
/// # Examples
///
/// ```
/// use tokenkit::models::SettingsSnapshot;
/// use tokenkit::services::backfill_saturation;
///
/// let entries: SettingsSnapshot = [("color-primary", "#ff0000"), ("primary-dark-s", "40")]
///     .into_iter()
///     .collect();
/// let augmented = backfill_saturation(&entries).unwrap();
/// assert_eq!(augmented.get("primary-light-s"), Some("100"));
/// assert_eq!(augmented.get("primary-dark-s"), Some("40"));
/// ```
pub fn backfill_saturation(entries: &SettingsSnapshot) -> TokenResult<SettingsSnapshot> {
    let mut augmented = entries.clone();

    for (key, value) in entries.iter() {
        let Some(name) = base_color_name(key) else {
            if key.starts_with(BASE_COLOR_PREFIX) {
                debug!("no saturation back-fill for '{key}': not a base color key");
            }
            continue;
        };

        if is_non_derivable(value) {
            debug!("no saturation back-fill for '{key}': '{value}' has no derivable color");
            continue;
        }

        let base = color::derive(value).map_err(|e| e.with_key(key))?;

        for modifier in ColorModifier::ALL {
            let saturation_key = modifier.saturation_key(name);
            if !entries.contains_key(&saturation_key) {
                augmented.insert(saturation_key, base.s.to_string());
            }
        }
    }

    Ok(augmented)
}

/// Converts an untyped update document into settings.
///
/// Strings are kept, numbers are stringified and booleans become `"on"` or
/// `"off"`.
pub fn entries_from_json(value: &Value) -> TokenResult<SettingsSnapshot> {
    let object = value.as_object().ok_or(TokenError::InvalidInput {
        reason: InvalidInputReason::NotAMapping,
    })?;

    object
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(true) => "on".to_string(),
                Value::Bool(false) => "off".to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => {
                    return Err(TokenError::InvalidInput {
                        reason: InvalidInputReason::UnsupportedValue { key: key.clone() },
                    })
                }
            };
            Ok((key.clone(), value))
        })
        .collect()
}

/// The authoritative settings snapshot plus its collaborators.
pub struct SettingsStore<P, G> {
    snapshot: Mutex<SettingsSnapshot>,
    persistence: P,
    generator: G,
    table: ExpansionTable,
}

impl<P: SettingsPersistence, G: CssGenerator> SettingsStore<P, G> {
    /// Creates a store holding an empty snapshot.
    ///
    /// `table` is handed to the generator on regeneration.
    pub fn new(persistence: P, generator: G, table: ExpansionTable) -> Self {
        Self::with_snapshot(SettingsSnapshot::new(), persistence, generator, table)
    }

    /// Creates a store holding `snapshot`.
    pub fn with_snapshot(
        snapshot: SettingsSnapshot,
        persistence: P,
        generator: G,
        table: ExpansionTable,
    ) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            persistence,
            generator,
            table,
        }
    }

    /// Creates a store from the snapshot last saved by `persistence`.
    pub fn open(persistence: P, generator: G, table: ExpansionTable) -> TokenResult<Self> {
        let snapshot = persistence.load().map_err(TokenError::Persistence)?;
        debug!("loaded {} settings", snapshot.len());
        Ok(Self::with_snapshot(snapshot, persistence, generator, table))
    }

    /// Returns a copy of the current snapshot.
    pub fn get_all(&self) -> SettingsSnapshot {
        self.lock().clone()
    }

    /// Returns the current value of `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).map(str::to_string)
    }

    /// The persistence collaborator.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    /// The CSS generation collaborator.
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Merges `entries` into the snapshot.
    ///
    /// Base colors in `entries` first get their modifier saturations
    /// back-filled (see [`backfill_saturation`]); the augmented entries are
    /// then written over the current snapshot and the result is persisted.
    /// The generator runs only if `options.regenerate` is set and the snapshot
    /// actually changed.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidInput`] if `entries` is empty; nothing is done
    /// - [`TokenError::InvalidColor`] if a base color cannot be derived; nothing is merged
    /// - [`TokenError::Persistence`] if saving fails; the snapshot is left as it was
    /// - [`TokenError::Generation`] if regeneration fails; the previous snapshot
    ///   is restored and saved again, so retrying the same update regenerates
    pub fn update(
        &self,
        entries: &SettingsSnapshot,
        options: UpdateOptions,
    ) -> TokenResult<UpdateReport> {
        if entries.is_empty() {
            info!("settings update contained no entries, nothing to do");
            return Err(TokenError::InvalidInput {
                reason: InvalidInputReason::Empty,
            });
        }

        let augmented = backfill_saturation(entries)?;

        let mut current = self.lock();
        let merged = current.merged_with(&augmented);

        if merged == *current {
            info!("settings unchanged, skipping save and regeneration");
            return Ok(UpdateReport {
                saved: merged,
                changed: false,
                generated_count: 0,
            });
        }

        self.persistence
            .save(&merged)
            .map_err(TokenError::Persistence)?;
        info!(
            "saved {} settings ({} incoming, {} after back-fill)",
            merged.len(),
            entries.len(),
            augmented.len()
        );

        let generated_count = if options.regenerate {
            match self.generator.generate(&merged, &self.table) {
                Ok(count) => {
                    info!("regenerated {count} stylesheet file(s)");
                    count
                }
                Err(e) => {
                    // The snapshot stays in step with the last generated artifacts
                    warn!("regeneration failed, restoring the previous settings");
                    if let Err(restore) = self.persistence.save(&current) {
                        warn!("failed to restore the previous settings: {restore:#}");
                    }
                    return Err(TokenError::Generation(e));
                }
            }
        } else {
            debug!("regeneration not requested");
            0
        };

        *current = merged.clone();

        Ok(UpdateReport {
            saved: merged,
            changed: true,
            generated_count,
        })
    }

    /// Like [`Self::update`], for an untyped JSON document.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidInput`] if `value` is not an object, is empty, or
    /// holds a null, array or object value; otherwise as [`Self::update`].
    pub fn update_json(&self, value: &Value, options: UpdateOptions) -> TokenResult<UpdateReport> {
        let entries = entries_from_json(value)?;
        self.update(&entries, options)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SettingsSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
