//! Contact form: inline validation and the simulated submission
//!
//! Blur validates one field, input clears that field's error, submit
//! validates all three. A valid submit locks the button for the simulated
//! latency, then shows a success notification and resets the form. Submits
//! arriving while one is in flight are dropped.

use tracing::{debug, info};

use super::notify;
use super::validate::{self, Field, ValidationError};
use crate::app::{Context, ContactSubmission, FormPhase, NotificationKind, Timer};
use crate::error::{FolioError, Result};
use crate::surface::{ElementId, Surface};

const ERROR_CLASS: &str = "error";
const ERROR_MESSAGE_CLASS: &str = "error-message";
const ERROR_MESSAGE_SELECTOR: &str = ".error-message";
const LOADING_CLASS: &str = "loading";

/// Label shown on the submit button while sending
pub const SENDING_LABEL: &str = "Sending...";
/// Aggregate notification for a rejected submit
pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors above";
/// Notification shown once the simulated submission completes
pub const SUCCESS_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

/// The contact form's elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    form: ElementId,
    inputs: [Option<ElementId>; 3],
    submit: ElementId,
    original_label: Option<String>,
}

impl ContactForm {
    /// Resolve the form, its fields and its submit button
    ///
    /// # Errors
    ///
    /// Returns an error if the form exists but has no submit button
    pub fn init(cx: &mut Context<'_>) -> Result<Option<Self>> {
        let selectors = &cx.config.selectors;
        let Some(form) = cx.surface.query(&selectors.contact_form) else {
            debug!("Contact form not found");
            return Ok(None);
        };
        let Some(&submit) = cx
            .surface
            .query_within(form, &selectors.submit_button)
            .first()
        else {
            return Err(FolioError::MissingElement {
                controller: "contact form",
                selector: selectors.submit_button.clone(),
            });
        };

        let inputs = Field::ALL.map(|field| {
            let input = cx
                .surface
                .query_within(form, &format!("[name=\"{}\"]", field.name()))
                .first()
                .copied();
            if input.is_none() {
                debug!(%field, "Contact form field not found");
            }
            input
        });

        Ok(Some(Self {
            form,
            inputs,
            submit,
            original_label: None,
        }))
    }

    /// Whether `el` is the contact form or inside it
    #[must_use]
    pub fn owns(&self, surface: &dyn Surface, el: ElementId) -> bool {
        surface.contains(self.form, el)
    }

    /// Input element for `field`
    #[must_use]
    pub const fn input(&self, field: Field) -> Option<ElementId> {
        self.inputs[field.index()]
    }

    /// Field whose input is `el`
    #[must_use]
    pub fn field_of(&self, el: ElementId) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| self.input(*field) == Some(el))
    }

    /// Validate one field after it loses focus
    pub fn on_blur(&self, cx: &mut Context<'_>, field: Field) {
        let value = self.value(cx, field);
        self.clear_field_error(cx, field);
        if let Err(error) = validate::validate(field, &value) {
            self.show_field_error(cx, field, error);
        }
    }

    /// New input clears the field's displayed error
    pub fn on_input(&self, cx: &mut Context<'_>, field: Field, value: &str) {
        if let Some(input) = self.input(field)
            && cx.surface.value(input) != value
        {
            cx.surface.set_value(input, value);
        }
        self.clear_field_error(cx, field);
    }

    /// Validate everything and, if it all passes, start the submission
    pub fn submit(&mut self, cx: &mut Context<'_>) {
        if cx.state.form.phase == FormPhase::Submitting {
            debug!("Submission already in flight; ignoring submit");
            return;
        }
        cx.state.form.phase = FormPhase::Validating;

        let [name, email, message] = Field::ALL.map(|field| self.value(cx, field));
        let mut failed = false;
        for (field, value) in Field::ALL.into_iter().zip([&name, &email, &message]) {
            match validate::validate(field, value) {
                Ok(()) => self.clear_field_error(cx, field),
                Err(error) => {
                    failed = true;
                    self.show_field_error(cx, field, error);
                }
            }
        }

        if failed {
            debug!(fields = ?cx.state.form.failing_fields(), "Submission blocked");
            cx.state.form.phase = FormPhase::Idle;
            notify::show(cx, FIX_ERRORS_MESSAGE, NotificationKind::Error);
            return;
        }

        self.original_label = Some(cx.surface.text(self.submit));
        cx.surface.set_text(self.submit, SENDING_LABEL);
        cx.surface.set_disabled(self.submit, true);
        cx.surface.add_class(self.submit, LOADING_CLASS);

        cx.state.form.phase = FormPhase::Submitting;
        cx.state.form.pending = Some(ContactSubmission {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
        });
        cx.queue
            .schedule(cx.config.submit_latency_ms, Timer::SubmissionComplete);
        debug!("Submission pending");
    }

    /// Finish the simulated submission
    pub fn complete(&mut self, cx: &mut Context<'_>) {
        if cx.state.form.phase != FormPhase::Submitting {
            return;
        }
        if let Some(label) = self.original_label.take() {
            cx.surface.set_text(self.submit, &label);
        }
        cx.surface.set_disabled(self.submit, false);
        cx.surface.remove_class(self.submit, LOADING_CLASS);

        cx.state.form.phase = FormPhase::Idle;
        cx.state.form.delivered = cx.state.form.pending.take();
        info!("Contact form submitted");

        notify::show(cx, SUCCESS_MESSAGE, NotificationKind::Success);

        for control in cx.surface.query_within(self.form, "input, textarea") {
            cx.surface.set_value(control, "");
        }
        for flagged in cx.surface.query_within(self.form, ".error") {
            cx.surface.remove_class(flagged, ERROR_CLASS);
        }
        for message in cx.surface.query_within(self.form, ERROR_MESSAGE_SELECTOR) {
            cx.surface.remove(message);
        }
        cx.state.form.clear_errors();
    }

    fn value(&self, cx: &Context<'_>, field: Field) -> String {
        self.input(field)
            .map(|input| cx.surface.value(input))
            .unwrap_or_default()
    }

    fn show_field_error(&self, cx: &mut Context<'_>, field: Field, error: ValidationError) {
        cx.state.form.set_error(field, Some(error));
        let Some(input) = self.input(field) else {
            return;
        };
        cx.surface.add_class(input, ERROR_CLASS);
        let Some(group) = cx.surface.parent(input) else {
            return;
        };
        for stale in cx.surface.query_within(group, ERROR_MESSAGE_SELECTOR) {
            cx.surface.remove(stale);
        }
        let message = cx.surface.create_element("div", group);
        cx.surface
            .set_attribute(message, "class", ERROR_MESSAGE_CLASS);
        cx.surface.set_text(message, &error.to_string());
    }

    fn clear_field_error(&self, cx: &mut Context<'_>, field: Field) {
        cx.state.form.set_error(field, None);
        let Some(input) = self.input(field) else {
            return;
        };
        cx.surface.remove_class(input, ERROR_CLASS);
        if let Some(group) = cx.surface.parent(input) {
            for message in cx.surface.query_within(group, ERROR_MESSAGE_SELECTOR) {
                cx.surface.remove(message);
            }
        }
    }
}
