use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mass_mailer::campaign::{load_recipients, Config, Recipient, Template, TemplateKind};
use mass_mailer::common::{Error, Mode, Result, Transport};
use mass_mailer::service::MassMailer;

#[derive(Default, Clone)]
struct Outbox {
    messages: Rc<RefCell<Vec<(String, Vec<String>, String)>>>,
    refuse: Vec<String>,
}

impl Transport for Outbox {
    fn send(&self, from: &str, recipients: &[String], message: &[u8]) -> Result<()> {
        if self.refuse.contains(&recipients[0]) {
            return Err(Error::TransportError {
                message: format!("Delivery to {} failed", recipients[0]),
                source: "421 service not available".into(),
            });
        }
        self.messages.borrow_mut().push((
            from.to_string(),
            recipients.to_vec(),
            String::from_utf8_lossy(message).into_owned(),
        ));
        Ok(())
    }
}

struct Campaign {
    dir: tempfile::TempDir,
}

impl Campaign {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn load(
    config: &Path,
    template: &Path,
    recipients: &Path,
    outbox: &Outbox,
) -> (MassMailer, Vec<Recipient>) {
    let mailer = MassMailer::new(
        Config::load(config).unwrap(),
        Template::load(template).unwrap(),
        Box::new(outbox.clone()),
    );
    (mailer, load_recipients(recipients).unwrap())
}

#[test]
fn duplicate_recipient_is_sent_once() {
    let campaign = Campaign::new();
    let config = campaign.write("config.ini", "SMTP=s\nFROM=a@x\nSUBJECT=Hi\n");
    let template = campaign.write("mail.txt", "Hello {{FIRST_LASTNAME}}!");
    let recipients = campaign.write("emails.csv", "John,Doe,john@x\n,,john@x\n");
    let outbox = Outbox::default();

    let (mailer, recipients) = load(&config, &template, &recipients, &outbox);
    let result = mailer.dispatch(&recipients, Mode::Live);

    assert_eq!(recipients.len(), 2);
    assert_eq!((result.errors, result.skipped, result.total), (0, 1, 2));
    assert_eq!(result.sent, 1);
    assert_eq!(
        result.to_string(),
        "0 errors, 1 skipped emails when trying to send 2 messages"
    );

    let messages = outbox.messages.borrow();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].2.contains("Hello John Doe!"));
    assert!(messages[0].2.contains("Content-Type: text/plain; charset=utf-8"));
}

#[test]
fn blank_names_get_the_configured_greeting() {
    let campaign = Campaign::new();
    let config = campaign.write(
        "config.ini",
        "[mail]\nSMTP=s\nFROM=a@x\nSUBJECT=Hi\nFIRST_LASTNAME=Dear reader\n",
    );
    let template = campaign.write("mail.html", "<p>{{FIRST_LASTNAME}}</p>");
    let recipients = campaign.write("emails.csv", "# who\n,,anon@x\n");
    let outbox = Outbox::default();

    let (mailer, recipients) = load(&config, &template, &recipients, &outbox);
    mailer.dispatch(&recipients, Mode::Live);

    let messages = outbox.messages.borrow();
    assert!(messages[0].2.contains("<p>Dear reader</p>"));
    assert!(messages[0].2.contains("Content-Type: text/html; charset=utf-8"));
}

#[test]
fn failures_are_counted_and_the_run_continues() {
    let campaign = Campaign::new();
    let config = campaign.write("config.ini", "SMTP=s\nFROM=a@x\nSUBJECT=Hi\nBCC=copy@x\n");
    let template = campaign.write("mail.txt", "Hi {{FIRST_LASTNAME}}");
    let recipients = campaign.write("emails.csv", "A,,a@x\nB,,b@x\nC,,c@x\n");
    let outbox = Outbox {
        refuse: vec!["b@x".into()],
        ..Default::default()
    };

    let (mailer, recipients) = load(&config, &template, &recipients, &outbox);
    let result = mailer.dispatch(&recipients, Mode::Live);

    assert_eq!((result.sent, result.errors, result.skipped), (2, 1, 0));
    for (from, rcpts, message) in outbox.messages.borrow().iter() {
        assert_eq!(from, "a@x");
        assert_eq!(rcpts[1], "copy@x");
        assert!(!message.contains("copy@x"));
    }
}

#[test]
fn dry_run_sends_nothing() {
    let campaign = Campaign::new();
    let config = campaign.write("config.ini", "SMTP=s\nFROM=a@x\nSUBJECT=Hi\n");
    let template = campaign.write("mail.txt", "Hello {{FIRST_LASTNAME}}!");
    let recipients = campaign.write("emails.csv", "John,Doe,john@x\nJane,Roe,jane@x\n");
    let outbox = Outbox {
        refuse: vec!["john@x".into()],
        ..Default::default()
    };

    let (mailer, recipients) = load(&config, &template, &recipients, &outbox);
    let result = mailer.dispatch(&recipients, Mode::DryRun);

    assert!(outbox.messages.borrow().is_empty());
    assert_eq!((result.sent, result.simulated, result.errors), (0, 2, 0));
}

#[test]
fn two_field_row_aborts_loading() {
    let campaign = Campaign::new();
    let recipients = campaign.write("emails.csv", "John,Doe,john@x\nA,B\n");

    let err = load_recipients(&recipients).unwrap_err();
    assert!(matches!(err, Error::MalformedRow { line_number: 2, .. }));
}

#[test]
fn load_errors_are_typed() {
    let campaign = Campaign::new();

    let config = campaign.write("config.ini", "SMTP=s\nFROM=a@x\n");
    assert!(matches!(
        Config::load(&config).unwrap_err(),
        Error::MissingRequiredKey { ref key } if key == "SUBJECT"
    ));

    let template = campaign.write("mail.md", "Hello");
    assert!(matches!(
        Template::load(&template).unwrap_err(),
        Error::UnsupportedTemplateKind { .. }
    ));

    let template = campaign.write("mail.txt", [0xff, 0xfe, 0x00]);
    assert!(matches!(
        Template::load(&template).unwrap_err(),
        Error::EncodingError { .. }
    ));

    let missing = campaign.dir.path().join("absent.csv");
    assert!(matches!(
        load_recipients(&missing).unwrap_err(),
        Error::ReadError { .. }
    ));
}

#[test]
fn template_kind_comes_from_extension() {
    let campaign = Campaign::new();
    let template = Template::load(&campaign.write("mail.html", "<b>hi</b>")).unwrap();
    assert_eq!(template.kind, TemplateKind::Html);
}
