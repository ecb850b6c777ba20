//! Contact form validation and the simulated submission

use crate::common::{element, fill_form, page};
use folio::app::{ContactSubmission, Event, FormPhase, NotificationKind};
use folio::controllers::form::{FIX_ERRORS_MESSAGE, SENDING_LABEL, SUCCESS_MESSAGE};
use folio::controllers::validate::{Field, is_valid_email};
use folio::Surface;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case("a@b.co", true)]
#[case("", false)]
#[case("a@b", false)]
#[case("a b@c.com", false)]
#[case("first.last@sub.example.org", true)]
fn test_email_pattern(#[case] email: &str, #[case] valid: bool) {
    assert_eq!(is_valid_email(email), valid);
}

#[test]
fn test_valid_submission_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let submit = element(&page, "button[type=\"submit\"]")?;
    fill_form(&mut page, "Al", "al@example.com", "Hello there friend");

    page.dispatch(Event::SubmitRequested);
    assert_eq!(page.state().form.phase, FormPhase::Submitting);
    assert_eq!(page.surface().text(submit), SENDING_LABEL);
    assert!(page.surface().is_disabled(submit));
    assert!(page.surface().has_class(submit, "loading"));

    page.advance_by(2000);
    assert_eq!(page.state().form.phase, FormPhase::Idle);
    assert_eq!(page.surface().text(submit), "Send Message");
    assert!(!page.surface().is_disabled(submit));
    assert!(!page.surface().has_class(submit, "loading"));
    assert_eq!(
        page.state().form.delivered,
        Some(ContactSubmission {
            name: "Al".to_string(),
            email: "al@example.com".to_string(),
            message: "Hello there friend".to_string(),
        })
    );

    let notification = page.state().notification.as_ref().ok_or("no notification")?;
    assert_eq!(notification.message, SUCCESS_MESSAGE);
    assert_eq!(notification.kind, NotificationKind::Success);
    for name in ["name", "email", "message"] {
        let input = element(&page, &format!("[name=\"{name}\"]"))?;
        assert_eq!(page.surface().value(input), "");
    }
    Ok(())
}

#[test]
fn test_empty_name_blocks_submission() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    fill_form(&mut page, "", "al@example.com", "Hello there friend");
    page.dispatch(Event::SubmitRequested);

    assert_eq!(page.state().form.phase, FormPhase::Idle);
    assert_eq!(page.state().form.failing_fields(), vec![Field::Name]);

    let name = element(&page, "[name=\"name\"]")?;
    assert!(page.surface().has_class(name, "error"));
    let group = page.surface().parent(name).ok_or("no group")?;
    let messages = page.surface().query_within(group, ".error-message");
    assert_eq!(messages.len(), 1);
    assert_eq!(page.surface().text(messages[0]), "Name is required");

    let notification = page.state().notification.as_ref().ok_or("no notification")?;
    assert_eq!(notification.message, FIX_ERRORS_MESSAGE);
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(page.pending_timers(), 2, "only the notification timers");
    Ok(())
}

#[test]
fn test_blur_then_input_clears_error() -> Result<(), Box<dyn std::error::Error>> {
    let mut page = page();
    let email = element(&page, "[name=\"email\"]")?;
    page.dispatch(Event::FieldInput {
        field: Field::Email,
        value: "nope".to_string(),
    });
    page.dispatch(Event::FieldBlurred(Field::Email));
    assert!(page.surface().has_class(email, "error"));
    assert_eq!(page.surface().query_all(".error-message").len(), 1);

    // blurring again replaces the message instead of stacking another
    page.dispatch(Event::FieldBlurred(Field::Email));
    assert_eq!(page.surface().query_all(".error-message").len(), 1);

    page.dispatch(Event::FieldInput {
        field: Field::Email,
        value: "nope@example.com".to_string(),
    });
    assert!(!page.surface().has_class(email, "error"));
    assert!(page.surface().query_all(".error-message").is_empty());
    assert_eq!(page.state().form.error(Field::Email), None);
    Ok(())
}

#[test]
fn test_submit_while_pending_is_ignored() {
    let mut page = page();
    fill_form(&mut page, "Al", "al@example.com", "Hello there friend");
    page.dispatch(Event::SubmitRequested);
    page.advance_by(1000);
    page.dispatch(Event::SubmitRequested);

    // one completion, at the original deadline
    page.advance_by(1000);
    assert_eq!(page.state().form.phase, FormPhase::Idle);
    assert!(page.state().form.delivered.is_some());
}
