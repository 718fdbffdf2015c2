// Input settings and binding files

use super::action::{DeviceClass, Input};
use super::buffer::DEFAULT_BUFFER_WINDOW_MS;
use super::device::{MAX_KEYS, MAX_MOUSE_BUTTONS};
use super::keys::{self, button, key};
use super::manager::{ActionMappings, InputManager};
use super::InputError;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default interval between hold notifications
pub const DEFAULT_HOLD_NOTIFY_INTERVAL_MS: u64 = 100;

/// Tunables for an [`InputManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// How long a press or release counts as "recent"
    pub buffer_window_ms: u64,
    pub hold_notify_interval_ms: u64,
    pub buffering_enabled: bool,
    /// Queue press/release notifications until explicitly processed
    pub deferred_dispatch: bool,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            buffer_window_ms: DEFAULT_BUFFER_WINDOW_MS,
            hold_notify_interval_ms: DEFAULT_HOLD_NOTIFY_INTERVAL_MS,
            buffering_enabled: true,
            deferred_dispatch: false,
        }
    }
}

/// One input entry of a binding file
///
/// A numeric `code` wins over a `key` name when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// "keyboard" or "mouse", case-insensitive
    #[serde(rename = "type")]
    pub device: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl InputConfig {
    /// Entry naming a key or button
    pub fn named(device: DeviceClass, key: impl Into<String>) -> Self {
        Self {
            device: device.to_string(),
            key: Some(key.into()),
            code: None,
        }
    }

    /// Entry with a raw code
    pub fn raw(device: DeviceClass, code: u32) -> Self {
        Self {
            device: device.to_string(),
            key: None,
            code: Some(code),
        }
    }

    /// Turn the entry into a concrete, in-range input
    pub fn resolve(&self) -> Result<Input, InputError> {
        let device = match self.device.trim().to_ascii_lowercase().as_str() {
            "keyboard" => DeviceClass::Keyboard,
            "mouse" => DeviceClass::Mouse,
            _ => return Err(InputError::UnknownDeviceType(self.device.clone())),
        };

        let name = self.key.as_deref().map(str::trim).filter(|k| !k.is_empty());
        let code = match (self.code, name) {
            (Some(code), _) => code,
            (None, Some(name)) => match device {
                DeviceClass::Keyboard => keys::key_code(name)
                    .ok_or_else(|| InputError::UnknownKeyName(name.to_string()))?,
                DeviceClass::Mouse => keys::mouse_button_code(name)
                    .ok_or_else(|| InputError::UnknownMouseButton(name.to_string()))?,
            },
            (None, None) => return Err(InputError::MissingCode(device)),
        };

        let limit = match device {
            DeviceClass::Keyboard => MAX_KEYS,
            DeviceClass::Mouse => MAX_MOUSE_BUTTONS,
        };
        if usize::try_from(code).map_or(true, |c| c >= limit) {
            return Err(InputError::CodeOutOfRange { device, code });
        }

        Ok(match device {
            DeviceClass::Keyboard => Input::keyboard(code),
            DeviceClass::Mouse => Input::mouse(code),
        })
    }
}

impl From<Input> for InputConfig {
    /// Prefer a readable name, falling back to the raw code
    fn from(input: Input) -> Self {
        let name = match input.device() {
            DeviceClass::Keyboard => keys::key_name(input.code()),
            DeviceClass::Mouse => keys::mouse_button_name(input.code()),
        };
        if name.starts_with("UNKNOWN_") {
            Self::raw(input.device(), input.code())
        } else {
            Self::named(input.device(), name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default)]
    pub actions: IndexMap<String, ActionConfig>,
}

/// Category -> action -> inputs, as stored in a binding file
///
/// ```json
/// {
///   "movement": {
///     "actions": {
///       "jump": { "inputs": [{ "type": "keyboard", "key": "SPACE" }] }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingConfig {
    pub categories: IndexMap<String, CategoryConfig>,
}

impl BindingConfig {
    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and validate a binding file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read binding file {}", path.display()))?;
        let config = Self::from_json_str(&json)
            .with_context(|| format!("Invalid JSON in binding file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid bindings in {}", path.display()))?;

        log::info!(
            "Loaded {} input categories from {}",
            config.categories.len(),
            path.display()
        );
        Ok(config)
    }

    /// Check every input resolves. Empty categories and actions only warn.
    pub fn validate(&self) -> Result<(), InputError> {
        for (category, category_config) in &self.categories {
            if category_config.actions.is_empty() {
                log::warn!("Input category {category} has no actions");
            }
            for (action, action_config) in &category_config.actions {
                if action_config.inputs.is_empty() {
                    log::warn!("Action {action} in category {category} has no inputs");
                }
                for input in &action_config.inputs {
                    input.resolve().map_err(|source| InputError::InvalidBinding {
                        category: category.clone(),
                        action: action.clone(),
                        source: Box::new(source),
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Validate, then bind every action into its category
    pub fn apply(&self, manager: &mut InputManager) -> Result<(), InputError> {
        self.validate()?;

        for (category, category_config) in &self.categories {
            manager.create_category(category);
            for (action, action_config) in &category_config.actions {
                manager.bind(Some(category.as_str()), action, &[]);
                for entry in &action_config.inputs {
                    let input = entry.resolve()?;
                    manager.add_input_to_action(action, input);
                    log::debug!("Bound {input} to action {action}");
                }
            }
            log::info!(
                "Configured category {category} with {} actions",
                category_config.actions.len()
            );
        }
        Ok(())
    }

    /// Drop every existing binding, then apply
    ///
    /// Nothing changes when the config doesn't validate.
    pub fn reload(&self, manager: &mut InputManager) -> Result<(), InputError> {
        self.validate()?;
        manager.clear_all_action_inputs();
        self.apply(manager)?;
        log::info!("Reloaded input bindings");
        Ok(())
    }

    /// Build a config from the manager's exported mappings
    pub fn from_mappings(mappings: &ActionMappings) -> Self {
        let categories = mappings
            .iter()
            .map(|(category, actions)| {
                let actions = actions
                    .iter()
                    .map(|(action, inputs)| {
                        let inputs = inputs.iter().copied().map(InputConfig::from).collect();
                        (action.clone(), ActionConfig { inputs })
                    })
                    .collect();
                (category.clone(), CategoryConfig { actions })
            })
            .collect();
        Self { categories }
    }

    pub fn to_json_string(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InputError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Bindings used when no file is given
pub fn default_bindings() -> BindingConfig {
    let keyboard = |code| InputConfig::from(Input::keyboard(code));
    let mouse = |code| InputConfig::from(Input::mouse(code));

    let category = |actions: Vec<(&str, Vec<InputConfig>)>| CategoryConfig {
        actions: actions
            .into_iter()
            .map(|(name, inputs)| (name.to_string(), ActionConfig { inputs }))
            .collect(),
    };

    let mut categories = IndexMap::new();
    categories.insert(
        "movement".to_string(),
        category(vec![
            ("move_left", vec![keyboard(key::A), keyboard(key::LEFT)]),
            ("move_right", vec![keyboard(key::D), keyboard(key::RIGHT)]),
            ("jump", vec![keyboard(key::SPACE), keyboard(key::W)]),
            ("duck", vec![keyboard(key::S), keyboard(key::DOWN)]),
        ]),
    );
    categories.insert(
        "combat".to_string(),
        category(vec![
            ("attack", vec![mouse(button::LEFT), keyboard(key::letter('J'))]),
            ("block", vec![mouse(button::RIGHT), keyboard(key::letter('K'))]),
        ]),
    );
    categories.insert(
        "menu".to_string(),
        category(vec![("pause", vec![keyboard(key::ESCAPE)])]),
    );
    BindingConfig { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "movement": {
            "actions": {
                "jump": {
                    "inputs": [
                        { "type": "keyboard", "key": "space" },
                        { "type": "KEYBOARD", "code": 87 }
                    ]
                },
                "duck": { "inputs": [{ "type": "keyboard", "key": "S" }] }
            }
        },
        "combat": {
            "actions": {
                "attack": { "inputs": [{ "type": "mouse", "key": "LMB" }] }
            }
        }
    }"#;

    fn manager() -> InputManager {
        InputManager::with_clock(InputSettings::default(), crate::core::ManualClock::new(0))
    }

    #[test]
    fn test_settings_defaults() {
        let settings = InputSettings::default();
        assert_eq!(settings.buffer_window_ms, 150);
        assert_eq!(settings.hold_notify_interval_ms, 100);
        assert!(settings.buffering_enabled);
        assert!(!settings.deferred_dispatch);
    }

    #[test]
    fn test_settings_partial_json() {
        let settings: InputSettings =
            serde_json::from_str(r#"{"buffer_window_ms": 200}"#).unwrap();
        assert_eq!(settings.buffer_window_ms, 200);
        assert_eq!(settings.hold_notify_interval_ms, 100);
        assert!(settings.buffering_enabled);
    }

    #[test]
    fn test_parse_sample() {
        let config = BindingConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            config.categories.keys().collect::<Vec<_>>(),
            vec!["movement", "combat"]
        );
        let jump = &config.categories["movement"].actions["jump"];
        assert_eq!(jump.inputs.len(), 2);
        assert_eq!(jump.inputs[1].code, Some(87));
        config.validate().unwrap();
    }

    #[test]
    fn test_resolve_inputs() {
        let named = InputConfig::named(DeviceClass::Keyboard, " escape ");
        assert_eq!(named.resolve().unwrap(), Input::keyboard(key::ESCAPE));

        let mouse = InputConfig::named(DeviceClass::Mouse, "right");
        assert_eq!(mouse.resolve().unwrap(), Input::mouse(button::RIGHT));

        let both = InputConfig {
            device: "keyboard".to_string(),
            key: Some("A".to_string()),
            code: Some(key::D),
        };
        assert_eq!(both.resolve().unwrap(), Input::keyboard(key::D));
    }

    #[test]
    fn test_resolve_errors() {
        let bad_type = InputConfig::raw(DeviceClass::Keyboard, 1);
        let bad_type = InputConfig {
            device: "gamepad".to_string(),
            ..bad_type
        };
        assert!(matches!(
            bad_type.resolve(),
            Err(InputError::UnknownDeviceType(t)) if t == "gamepad"
        ));

        assert!(matches!(
            InputConfig::named(DeviceClass::Keyboard, "NOT_A_KEY").resolve(),
            Err(InputError::UnknownKeyName(_))
        ));
        assert!(matches!(
            InputConfig::named(DeviceClass::Mouse, "WHEEL_UP").resolve(),
            Err(InputError::UnknownMouseButton(_))
        ));
        assert!(matches!(
            InputConfig::named(DeviceClass::Keyboard, "   ").resolve(),
            Err(InputError::MissingCode(DeviceClass::Keyboard))
        ));
        assert!(matches!(
            InputConfig::raw(DeviceClass::Keyboard, 512).resolve(),
            Err(InputError::CodeOutOfRange { code: 512, .. })
        ));
        assert!(matches!(
            InputConfig::raw(DeviceClass::Mouse, 10).resolve(),
            Err(InputError::CodeOutOfRange { device: DeviceClass::Mouse, .. })
        ));
    }

    #[test]
    fn test_validate_reports_location() {
        let json = r#"{"menu": {"actions": {"pause": {"inputs": [{"type": "keyboard", "key": "NOPE"}]}}}}"#;
        let config = BindingConfig::from_json_str(json).unwrap();
        match config.validate() {
            Err(InputError::InvalidBinding { category, action, .. }) => {
                assert_eq!(category, "menu");
                assert_eq!(action, "pause");
            }
            other => panic!("expected invalid binding, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_sections_are_valid() {
        let json = r#"{"empty": {"actions": {}}, "menu": {"actions": {"noop": {"inputs": []}}}}"#;
        let config = BindingConfig::from_json_str(json).unwrap();
        config.validate().unwrap();

        let mut manager = manager();
        config.apply(&mut manager).unwrap();
        assert_eq!(manager.category_names(), vec!["empty", "menu"]);
        assert!(manager.action("noop").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            BindingConfig::from_json_str("{ not json"),
            Err(InputError::Parse(_))
        ));
    }

    #[test]
    fn test_apply_binds_through_categories() {
        let mut manager = manager();
        BindingConfig::from_json_str(SAMPLE)
            .unwrap()
            .apply(&mut manager)
            .unwrap();

        assert_eq!(manager.action_names(), vec!["jump", "duck", "attack"]);
        assert_eq!(manager.actions_for_key_code(key::SPACE), vec!["jump"]);
        assert_eq!(manager.actions_for_key_code(key::W), vec!["jump"]);
        assert_eq!(manager.actions_for_mouse_button(button::LEFT), vec!["attack"]);
        assert_eq!(manager.actions_for_category("movement").len(), 2);
    }

    #[test]
    fn test_reload_replaces_bindings() {
        let mut manager = manager();
        BindingConfig::from_json_str(SAMPLE)
            .unwrap()
            .apply(&mut manager)
            .unwrap();

        let json = r#"{"movement": {"actions": {"jump": {"inputs": [{"type": "keyboard", "key": "UP"}]}}}}"#;
        BindingConfig::from_json_str(json)
            .unwrap()
            .reload(&mut manager)
            .unwrap();

        assert!(manager.actions_for_key_code(key::SPACE).is_empty());
        assert_eq!(manager.actions_for_key_code(key::UP), vec!["jump"]);
        // Actions missing from the new file stay registered without inputs
        assert!(manager.action("duck").unwrap().is_empty());
        assert!(manager.actions_for_mouse_button(button::LEFT).is_empty());
    }

    #[test]
    fn test_failed_reload_keeps_bindings() {
        let mut manager = manager();
        BindingConfig::from_json_str(SAMPLE)
            .unwrap()
            .apply(&mut manager)
            .unwrap();

        let json = r#"{"movement": {"actions": {"jump": {"inputs": [{"type": "joystick", "code": 1}]}}}}"#;
        let bad = BindingConfig::from_json_str(json).unwrap();
        assert!(bad.reload(&mut manager).is_err());
        assert_eq!(manager.actions_for_key_code(key::SPACE), vec!["jump"]);
    }

    #[test]
    fn test_export_uses_names_when_known() {
        let mut manager = manager();
        manager.bind(
            Some("movement"),
            "jump",
            &[Input::keyboard(key::SPACE), Input::keyboard(500)],
        );

        let config = BindingConfig::from_mappings(&manager.action_mappings());
        let inputs = &config.categories["movement"].actions["jump"].inputs;
        assert_eq!(inputs[0], InputConfig::named(DeviceClass::Keyboard, "SPACE"));
        assert_eq!(inputs[1], InputConfig::raw(DeviceClass::Keyboard, 500));

        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"type\": \"keyboard\""));
        assert_eq!(BindingConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_default_bindings_are_valid() {
        let config = default_bindings();
        config.validate().unwrap();

        let mut manager = manager();
        config.apply(&mut manager).unwrap();
        assert_eq!(manager.category_names(), vec!["movement", "combat", "menu"]);
        assert_eq!(manager.actions_for_key_code(key::ESCAPE), vec!["pause"]);
        assert_eq!(manager.actions_for_mouse_button(button::LEFT), vec!["attack"]);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "input-actions-bindings-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, SAMPLE).unwrap();
        let config = BindingConfig::load(&path).unwrap();
        assert_eq!(config.categories.len(), 2);

        default_bindings().save(&path).unwrap();
        assert_eq!(BindingConfig::load(&path).unwrap(), default_bindings());
        std::fs::remove_file(&path).unwrap();

        let missing = BindingConfig::load(path.with_extension("missing"));
        assert!(missing.is_err());
    }
}
