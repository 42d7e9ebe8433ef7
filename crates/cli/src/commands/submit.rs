use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Args;

use billed_core::Session;
use billed_employee::{
    AttachmentUploader, FileInput, FileSelection, FormFields, NewBillForm, NewBillSubmission,
    SubmissionState, UploadPolicy,
};
use billed_store::{Store, UploadFile};
use billed_store_memory::MemorySessionStore;

use super::LogNavigator;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Receipt image to upload.
    pub receipt: PathBuf,
    /// Expense category (e.g. "Transports").
    #[arg(long = "type", default_value = "Transports")]
    pub expense_type: String,
    /// Expense name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Amount TTC, in euros.
    #[arg(long)]
    pub amount: String,
    /// Expense date, `YYYY-MM-DD`.
    #[arg(long)]
    pub date: String,
    /// VAT amount.
    #[arg(long, default_value = "")]
    pub vat: String,
    /// VAT percentage; 20 when empty or zero.
    #[arg(long, default_value = "")]
    pub pct: String,
    #[arg(long, default_value = "")]
    pub commentary: String,
}

impl SubmitArgs {
    fn fields(&self) -> FormFields {
        FormFields {
            expense_type: self.expense_type.clone(),
            expense_name: self.name.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
            vat: self.vat.clone(),
            pct: self.pct.clone(),
            commentary: self.commentary.clone(),
        }
    }
}

pub async fn run(
    store: Arc<dyn Store>,
    email: Option<&str>,
    policy: UploadPolicy,
    args: &SubmitArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let email = email.context("no employee email, pass --email or set BILLED_EMAIL")?;
    let sessions = Arc::new(MemorySessionStore::with_session(&Session::new(email))?);
    let navigator = Arc::new(LogNavigator);

    let mut input = receipt_input(&args.receipt)?;
    let form = NewBillForm::new();

    let uploader = AttachmentUploader::new(store.clone(), sessions.clone()).with_policy(policy);
    match uploader.on_file_selected(&mut input, &form).await? {
        FileSelection::Uploaded(reference) => {
            if matches!(format, OutputFormat::Text) {
                println!("Receipt uploaded: {} ({})", reference.file_url, reference.key);
            }
        }
        FileSelection::Rejected => bail!("{}", input.validation_message()),
        FileSelection::UploadFailed => bail!("receipt upload failed"),
        FileSelection::Empty => bail!("no receipt selected"),
    }

    let submission = NewBillSubmission::new(Some(store), sessions, navigator);
    let outcome = submission.on_submit(&args.fields(), &form).await?;

    if let Some(e) = outcome.error {
        return Err(e).context("bill submission failed");
    }
    if outcome.state != SubmissionState::Completed {
        bail!("bill was not submitted ({:?})", outcome.state);
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.bill)?);
        }
        OutputFormat::Text => {
            println!(
                "Bill '{}' submitted for {}.",
                outcome.bill.name, outcome.bill.email
            );
        }
    }
    Ok(())
}

/// Read `path` into a file input, as if it had been picked in the form.
fn receipt_input(path: &Path) -> anyhow::Result<FileInput> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid receipt path {}", path.display()))?;
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read receipt {}", path.display()))?;

    let mut file = UploadFile::new(file_name, data);
    if let Some(content_type) = image_content_type(file_name) {
        file = file.with_content_type(content_type);
    }
    Ok(FileInput::with_file(path.display().to_string(), file))
}

fn image_content_type(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}
