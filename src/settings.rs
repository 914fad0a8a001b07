//! Settings dialogs without a GUI toolkit.
//!
//! A [`SettingsForm`] knows how to populate itself, check its fields and
//! produce a value. [`SettingsDialog`] drives the shared open → apply/cancel
//! flow so each form only implements the parts that differ.

use crate::color::HexColor;
use crate::error::{Result, ThumbError};
use crate::template::{DEFAULT_BACKGROUND, GradientDirection, GradientSpec, ThumbnailTemplate};

/// One settings screen.
pub trait SettingsForm {
    type Output;

    /// Populate fields before the dialog is shown.
    fn build_content(&mut self);

    /// Build the result from the current fields. Only called after
    /// [`validate`](Self::validate) succeeded.
    fn collect_data(&self) -> Self::Output;

    /// Check the current fields; the error is shown to the user.
    fn validate(&self) -> std::result::Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Applied,
    Cancelled,
}

/// Open/apply/cancel flow around a form.
#[derive(Debug)]
pub struct SettingsDialog<F: SettingsForm> {
    title: String,
    form: F,
    state: DialogState,
}

impl<F: SettingsForm> SettingsDialog<F> {
    /// Build the form's content and open the dialog.
    pub fn open(title: impl Into<String>, mut form: F) -> Self {
        form.build_content();
        Self {
            title: title.into(),
            form,
            state: DialogState::Open,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Validate and hand the collected data to `on_apply`, closing the
    /// dialog. Invalid input returns the message and keeps it open.
    pub fn apply(&mut self, on_apply: impl FnOnce(F::Output)) -> std::result::Result<(), String> {
        if !self.is_open() {
            return Err(format!("dialog '{}' is already closed", self.title));
        }
        self.form.validate()?;
        on_apply(self.form.collect_data());
        self.state = DialogState::Applied;
        Ok(())
    }

    /// Close without producing data.
    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = DialogState::Cancelled;
        }
    }
}

/// Raw text fields for a new template.
///
/// Gradient fields are all-or-nothing: an empty direction means no gradient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateForm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub background_color: String,
    pub gradient_direction: String,
    pub gradient_color: String,
    pub gradient_opacity: String,
}

impl TemplateForm {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Fill the gradient fields from `direction:color:opacity`, e.g.
    /// `bottom:#000000:0.6`. Missing parts stay empty.
    pub fn set_gradient(&mut self, spec: &str) {
        let mut parts = spec.splitn(3, ':');
        self.gradient_direction = parts.next().unwrap_or_default().trim().to_string();
        self.gradient_color = parts.next().unwrap_or_default().trim().to_string();
        self.gradient_opacity = parts.next().unwrap_or_default().trim().to_string();
    }

    fn gradient(&self) -> Result<Option<GradientSpec>> {
        if self.gradient_direction.trim().is_empty() {
            return Ok(None);
        }
        let direction: GradientDirection = self.gradient_direction.parse()?;
        let color = HexColor::parse(self.gradient_color.trim())?;
        let opacity: f32 = self.gradient_opacity.trim().parse().map_err(|_| {
            ThumbError::Template(format!(
                "gradient opacity '{}' is not a number",
                self.gradient_opacity
            ))
        })?;
        Ok(Some(GradientSpec {
            direction,
            color,
            opacity,
        }))
    }

    /// Parse and validate every field into a template.
    pub fn to_template(&self) -> Result<ThumbnailTemplate> {
        let mut template = ThumbnailTemplate::new(self.id.trim(), self.name.trim());
        template.description = self.description.trim().to_string();
        template.background_color = HexColor::parse(self.background_color.trim())?;
        template.background_gradient = self.gradient()?;
        template.validate()?;
        Ok(template)
    }
}

impl SettingsForm for TemplateForm {
    type Output = ThumbnailTemplate;

    fn build_content(&mut self) {
        if self.background_color.trim().is_empty() {
            self.background_color = DEFAULT_BACKGROUND.to_string();
        }
        if !self.gradient_direction.trim().is_empty() {
            if self.gradient_color.trim().is_empty() {
                self.gradient_color = HexColor::BLACK.to_string();
            }
            if self.gradient_opacity.trim().is_empty() {
                self.gradient_opacity = "0.6".to_string();
            }
        }
    }

    fn collect_data(&self) -> ThumbnailTemplate {
        self.to_template()
            .unwrap_or_else(|_| ThumbnailTemplate::new(self.id.trim(), self.name.trim()))
    }

    fn validate(&self) -> std::result::Result<(), String> {
        self.to_template().map(|_| ()).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_hands_over_data_and_closes() {
        let mut form = TemplateForm::new("promo", "Promo");
        form.set_gradient("top");
        let mut dialog = SettingsDialog::open("New template", form);

        // Defaults filled in on open
        assert_eq!(dialog.form().background_color, DEFAULT_BACKGROUND);
        assert_eq!(dialog.form().gradient_opacity, "0.6");

        let mut received = None;
        dialog.apply(|t| received = Some(t)).unwrap();
        assert_eq!(dialog.state(), DialogState::Applied);

        let template = received.unwrap();
        assert_eq!(template.id, "promo");
        let gradient = template.background_gradient.unwrap();
        assert_eq!(gradient.direction, GradientDirection::Top);
        assert_eq!(gradient.opacity, 0.6);
    }

    #[test]
    fn test_invalid_input_keeps_dialog_open() {
        let mut dialog = SettingsDialog::open("New template", TemplateForm::new("x", ""));
        let mut called = false;
        let err = dialog.apply(|_| called = true).unwrap_err();
        assert!(err.contains("empty name"));
        assert!(!called);
        assert!(dialog.is_open());

        dialog.form_mut().name = "Fixed".to_string();
        assert!(dialog.apply(|_| called = true).is_ok());
        assert!(called);
    }

    #[test]
    fn test_bad_fields_rejected() {
        let mut form = TemplateForm::new("x", "X");
        form.build_content();
        form.set_gradient("bottom:#000000:1.5");
        assert!(form.validate().is_err());
        form.set_gradient("bottom:#000000:lots");
        assert!(form.validate().is_err());
        form.set_gradient("sideways:#000000:0.5");
        assert!(form.validate().is_err());
        form.set_gradient("bottom:#000000:0.5");
        form.background_color = "red".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_cancel_produces_nothing() {
        let mut dialog = SettingsDialog::open("New template", TemplateForm::new("x", "X"));
        dialog.cancel();
        assert_eq!(dialog.state(), DialogState::Cancelled);
        assert!(dialog.apply(|_| panic!("must not be called")).is_err());
    }
}
