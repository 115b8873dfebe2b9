//! Create/edit dialog for managed users, with the live availability probe.

use std::sync::Arc;

use pointer_client::{ApiError, UserDraft, UserStatus, UserType};
use pointer_flux::StateStore;
use tracing::{debug, info};

use crate::catalog;
use crate::context::HrContext;
use crate::error::FlowError;
use crate::handlers::console_handlers::{reload, show_toast};
use crate::handlers::session_handlers::absorb;
use crate::request::*;
use crate::state::*;
use crate::validation;

fn titles(sector: &str) -> Vec<String> {
    catalog::titles_for(sector)
        .iter()
        .map(|t| t.to_string())
        .collect()
}

/// Handle `users/form/open-create`.
pub async fn handle_open_create(store: &StateStore, ctx: &HrContext) {
    ctx.probe.cancel();
    store.set(
        UserFormState::PATH,
        UserFormState {
            mode: FormMode::Create,
            draft: UserDraft::new(),
            email_status: EmailStatus::Unchecked,
            titles: Vec::new(),
            busy: false,
            error: None,
        },
    );
}

/// Handle `users/form/open-edit`: load the record, then open prefilled.
pub async fn handle_open_edit(req: &OpenEditFormReq, store: &StateStore, ctx: &HrContext) {
    ctx.probe.cancel();
    match ctx.directory.get_by_email(&req.email).await {
        Ok(original) => {
            store.set(
                UserFormState::PATH,
                UserFormState {
                    draft: original.to_draft(),
                    titles: titles(&original.setor),
                    mode: FormMode::Edit { original },
                    email_status: EmailStatus::Unchecked,
                    busy: false,
                    error: None,
                },
            );
        }
        Err(e) => {
            if let Some(message) = absorb(store, ctx, e.into()) {
                show_toast(store, ctx, Toast::error(message));
            }
        }
    }
}

/// Follow-up of an email keystroke, run once the form is written.
enum EmailFollowUp {
    Probe(String),
    Cancel,
}

/// Handle `users/form/edit`.
pub async fn handle_edit_field(req: &EditFieldReq, store: &Arc<StateStore>, ctx: &Arc<HrContext>) {
    let mut follow_up = None;
    store.modify(UserFormState::PATH, |form: &mut UserFormState| {
        let value = req.value.clone();
        match req.field {
            FormField::Nome => form.draft.nome = value,
            FormField::Email => {
                if form.email_read_only() {
                    return false;
                }
                form.draft.email = value.trim().to_string();
                if validation::is_valid_email(&form.draft.email) {
                    form.email_status = EmailStatus::Checking;
                    follow_up = Some(EmailFollowUp::Probe(form.draft.email.clone()));
                } else {
                    form.email_status = EmailStatus::Unchecked;
                    follow_up = Some(EmailFollowUp::Cancel);
                }
            }
            FormField::Setor => {
                if form.draft.setor != value {
                    form.titles = titles(&value);
                    form.draft.setor = value;
                    form.draft.cargo.clear();
                }
            }
            FormField::Cargo => form.draft.cargo = value,
            FormField::TipoUsuario => form.draft.tipo_usuario = UserType::parse(&value),
            FormField::Status => form.draft.status = UserStatus::parse(&value),
        }
        form.error = None;
        true
    });

    match follow_up {
        Some(EmailFollowUp::Probe(email)) => schedule_probe(store, ctx, email),
        Some(EmailFollowUp::Cancel) => ctx.probe.cancel(),
        None => {}
    }
}

fn drafting(store: &StateStore, email: &str) -> bool {
    store
        .read::<UserFormState>(UserFormState::PATH)
        .is_some_and(|form| form.draft.email == email)
}

fn schedule_probe(store: &Arc<StateStore>, ctx: &Arc<HrContext>, email: String) {
    let store = Arc::clone(store);
    let handler_ctx = Arc::clone(ctx);
    let probed = email.clone();
    ctx.probe.schedule(Arc::clone(&ctx.email_probe), email, move |result| {
        let (status, error) = match result {
            Ok(true) => (EmailStatus::Available, None),
            Ok(false) => (EmailStatus::Taken, None),
            Err(e) => {
                if !drafting(&store, &probed) {
                    debug!("availability failure for a previous email ignored");
                    return;
                }
                match absorb(&store, &handler_ctx, e.into()) {
                    Some(message) => (EmailStatus::Unchecked, Some(message)),
                    None => return,
                }
            }
        };
        let applied = store.modify(UserFormState::PATH, |form: &mut UserFormState| {
            if form.draft.email != probed {
                return false;
            }
            form.email_status = status;
            if error.is_some() {
                form.error = error;
            }
            true
        });
        if !applied {
            debug!("availability answer for a previous email ignored");
        }
    });
}

/// Checks run before any request, in display order.
fn validate(form: &UserFormState) -> Result<(), FlowError> {
    let d = &form.draft;
    if let Some(field) = d.first_blank_field() {
        return Err(FlowError::required(field));
    }
    if !validation::is_full_name(&d.nome) {
        return Err(FlowError::validation("error/full-name"));
    }
    if !catalog::is_valid_title(&d.setor, &d.cargo) {
        return Err(FlowError::validation("error/cargo-sector"));
    }
    if form.is_edit() {
        return Ok(());
    }
    validation::validate_email(&d.email)?;
    match form.email_status {
        EmailStatus::Available => Ok(()),
        EmailStatus::Taken => Err(FlowError::validation("error/email-taken")),
        EmailStatus::Checking | EmailStatus::Unchecked => {
            Err(FlowError::validation("error/email-unchecked"))
        }
    }
}

/// Handle `users/form/submit`. Success closes the dialog, toasts and
/// reloads the listing.
pub async fn handle_submit(store: &StateStore, ctx: &HrContext) {
    let Some(mut form) = store.read::<UserFormState>(UserFormState::PATH) else {
        return;
    };
    if let Err(e) = validate(&form) {
        form.error = Some(ctx.message(&e));
        store.set(UserFormState::PATH, form);
        return;
    }

    form.busy = true;
    form.error = None;
    store.set(UserFormState::PATH, form.clone());

    let result = match &form.mode {
        FormMode::Create => ctx
            .directory
            .create(&form.draft)
            .await
            .map(|()| "toast/user-created"),
        FormMode::Edit { original } => ctx
            .directory
            .update(&original.id, original, &form.draft)
            .await
            .map(|()| "toast/user-updated"),
    };

    match result {
        Ok(toast) => {
            info!(email = %form.draft.email, "user form saved");
            ctx.probe.cancel();
            store.remove(UserFormState::PATH);
            show_toast(store, ctx, Toast::success(ctx.t(toast)));
            reload(store, ctx).await;
        }
        Err(e) => {
            let duplicate = matches!(e, ApiError::DuplicateEmail);
            let Some(message) = absorb(store, ctx, e.into()) else {
                return;
            };
            form.busy = false;
            form.error = Some(message);
            if duplicate {
                form.email_status = EmailStatus::Taken;
            }
            store.set(UserFormState::PATH, form);
        }
    }
}

/// Handle `users/form/close`.
pub async fn handle_close(store: &StateStore, ctx: &HrContext) {
    ctx.probe.cancel();
    store.remove(UserFormState::PATH);
}
