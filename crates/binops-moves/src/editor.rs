//! Submitting a validated form to the backend.
//!
//! Edits run as a short sequence of calls (fields update, then the
//! assignment call) that can pause on a route conflict and resume at the
//! rejected call. Creation and bulk assignment run one request per target,
//! in order, without rollback.

use binops_client::{
    AssignToShift, AssignToUser, BulkAssignMoves, ClientError, ConflictOverrides,
    MoveRequestUpdate,
};
use chrono::{NaiveDate, Utc};

use crate::api::MoveRequestApi;
use crate::cache::{CacheInvalidator, AFTER_MOVE_MUTATION};
use crate::conflict::{classify_client_error, is_stale_update, ErrorClass};
use crate::error::{SubmitError, ValidationError};
use crate::form::{
    AssignmentChoice, AssignmentTarget, BinTarget, MoveFields, MoveForm, SubmitTargets,
};
use crate::pending::{EditPlan, EditStage, PendingOperation, Resolution, Resume, ResumeKind};
use crate::picker::ShiftInsertion;

#[derive(Debug)]
pub enum SubmitOutcome {
    Created(CreateReport),
    Updated { move_request_id: String },
    Assigned { move_request_ids: Vec<String> },
    /// Paused on a route conflict; answer it with
    /// [`MoveRequestEditor::resolve`].
    NeedsConfirmation(PendingOperation),
}

/// Result of creating one or more move requests.
#[derive(Debug, Default)]
pub struct CreateReport {
    /// Ids in the order the bins were supplied.
    pub created: Vec<String>,
    /// Created requests whose assignment call failed. They stay unassigned.
    pub assignment_failures: Vec<AssignmentFailure>,
}

#[derive(Debug)]
pub struct AssignmentFailure {
    pub move_request_id: String,
    pub error: ClientError,
}

/// Drives create, edit, cancel and bulk-assign against a backend.
pub struct MoveRequestEditor<'a, A, C> {
    api: &'a A,
    cache: &'a C,
    today: NaiveDate,
}

impl<'a, A: MoveRequestApi, C: CacheInvalidator> MoveRequestEditor<'a, A, C> {
    #[must_use]
    pub fn new(api: &'a A, cache: &'a C) -> Self {
        Self {
            api,
            cache,
            today: Utc::now().date_naive(),
        }
    }

    /// Overrides the day used for the "not in the past" check.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Validates and submits a form.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] before any call is made,
    /// [`SubmitError::StaleUpdate`] when the request changed since it was
    /// loaded, [`SubmitError::Create`] when a bulk create stops part-way, and
    /// [`SubmitError::Request`] for any other failure.
    pub async fn submit(&self, form: &MoveForm) -> Result<SubmitOutcome, SubmitError> {
        let validated = form.validate(self.today)?;
        match validated.targets {
            SubmitTargets::Create(bins) => self
                .create(&bins, &validated.fields, &validated.assignment)
                .await
                .map(SubmitOutcome::Created),
            SubmitTargets::Edit(original) => {
                let lock_token = original.updated_at;
                let plan = EditPlan::new(original, validated.fields, validated.assignment);
                tracing::debug!(
                    move_request_id = %plan.original.id,
                    assignment_changed = plan.assignment_changed,
                    "submitting move request edit"
                );
                let stage = plan.first_stage();
                self.run_edit(plan, stage, lock_token, ConflictOverrides::default())
                    .await
            }
        }
    }

    /// Resumes a paused submission with the operator's answer.
    ///
    /// Overrides confirmed earlier in the same submission are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ActiveShiftNotAcknowledged`] or
    /// [`ValidationError::ResolutionMismatch`] without calling the backend;
    /// otherwise the same errors as [`Self::submit`].
    pub async fn resolve(
        &self,
        pending: &PendingOperation,
        resolution: Resolution,
    ) -> Result<SubmitOutcome, SubmitError> {
        let added = pending.accept(resolution)?;
        let Resume { kind, overrides } = pending.resume().clone();
        let overrides = overrides.merged(added);
        tracing::info!(?resolution, "resuming after route conflict");
        match kind {
            ResumeKind::Edit {
                plan,
                stage,
                lock_token,
            } => self.run_edit(plan, stage, lock_token, overrides).await,
            ResumeKind::BulkAssign { payload } => {
                self.run_bulk_assign(BulkAssignMoves {
                    overrides,
                    ..payload
                })
                .await
            }
        }
    }

    /// Cancels a move request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCancelReason`] for a blank reason,
    /// otherwise [`SubmitError::StaleUpdate`] or [`SubmitError::Request`].
    pub async fn cancel(&self, move_request_id: &str, reason: &str) -> Result<(), SubmitError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyCancelReason.into());
        }
        self.api
            .cancel_move_request(move_request_id, reason)
            .await
            .map_err(into_submit_error)?;
        self.cache.invalidate(&AFTER_MOVE_MUTATION);
        Ok(())
    }

    /// Assigns existing move requests to one shift in a single call.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoMoveRequestsSelected`],
    /// [`ValidationError::ShiftRequired`] or the shift choice's own
    /// validation error before any call; otherwise the same errors as
    /// [`Self::submit`].
    pub async fn bulk_assign(
        &self,
        move_request_ids: &[String],
        choice: &AssignmentChoice,
    ) -> Result<SubmitOutcome, SubmitError> {
        if move_request_ids.is_empty() {
            return Err(ValidationError::NoMoveRequestsSelected.into());
        }
        if !matches!(
            choice,
            AssignmentChoice::ActiveShift { .. } | AssignmentChoice::FutureShift { .. }
        ) {
            return Err(ValidationError::ShiftRequired.into());
        }
        let AssignmentTarget::Shift {
            shift_id,
            insertion,
        } = choice.validate(None)?
        else {
            return Err(ValidationError::ShiftRequired.into());
        };
        let payload = BulkAssignMoves {
            move_request_ids: move_request_ids.to_vec(),
            shift_id,
            insert_after_bin_id: insertion
                .as_ref()
                .and_then(ShiftInsertion::insert_after_bin_id),
            insert_position: insertion
                .as_ref()
                .and_then(ShiftInsertion::insert_position),
            overrides: ConflictOverrides::default(),
        };
        self.run_bulk_assign(payload).await
    }

    async fn create(
        &self,
        bins: &[BinTarget],
        fields: &MoveFields,
        assignment: &AssignmentTarget,
    ) -> Result<CreateReport, SubmitError> {
        let mut created = Vec::with_capacity(bins.len());
        for bin in bins {
            match self
                .api
                .create_move_request(&fields.create_payload(&bin.bin_id))
                .await
            {
                Ok(move_request) => created.push(move_request.id),
                Err(source) if created.is_empty() => return Err(into_submit_error(source)),
                Err(source) => {
                    tracing::warn!(
                        bin_id = %bin.bin_id,
                        created = created.len(),
                        error = %source,
                        "bulk create stopped part-way"
                    );
                    self.cache.invalidate(&AFTER_MOVE_MUTATION);
                    return Err(SubmitError::Create { created, source });
                }
            }
        }

        let mut assignment_failures = Vec::new();
        if *assignment != AssignmentTarget::Unassigned {
            for id in &created {
                let overrides = ConflictOverrides::default();
                if let Err(error) = self.assign(id, assignment, overrides).await {
                    tracing::warn!(
                        move_request_id = %id,
                        error = %error,
                        "assignment after create failed"
                    );
                    assignment_failures.push(AssignmentFailure {
                        move_request_id: id.clone(),
                        error,
                    });
                }
            }
        }

        self.cache.invalidate(&AFTER_MOVE_MUTATION);
        Ok(CreateReport {
            created,
            assignment_failures,
        })
    }

    async fn run_edit(
        &self,
        plan: EditPlan,
        mut stage: EditStage,
        mut lock_token: i64,
        overrides: ConflictOverrides,
    ) -> Result<SubmitOutcome, SubmitError> {
        let id = plan.original.id.clone();
        let mut mutated = false;
        loop {
            let result = match stage {
                EditStage::Combined => {
                    let update = plan
                        .fields
                        .update_payload(lock_token)
                        .reasserting_assignment_of(&plan.original)
                        .with_overrides(overrides);
                    self.update(&id, &update).await
                }
                EditStage::FieldsUpdate => {
                    if !plan.fields.differs_from(&plan.original) {
                        stage = EditStage::Assignment;
                        continue;
                    }
                    let update = plan
                        .fields
                        .update_payload(lock_token)
                        .with_overrides(overrides);
                    self.update(&id, &update).await
                }
                EditStage::Assignment if plan.assignment == AssignmentTarget::Unassigned => {
                    let update = MoveRequestUpdate {
                        client_updated_at: Some(lock_token),
                        ..MoveRequestUpdate::default()
                    }
                    .clearing_assignment()
                    .with_overrides(overrides);
                    self.update(&id, &update).await
                }
                EditStage::Assignment => self
                    .assign(&id, &plan.assignment, overrides)
                    .await
                    .map(|()| None),
            };

            match result {
                Ok(updated_at) => {
                    mutated = true;
                    if let Some(updated_at) = updated_at {
                        lock_token = updated_at;
                    }
                    if stage == EditStage::FieldsUpdate {
                        stage = EditStage::Assignment;
                    } else {
                        break;
                    }
                }
                Err(err) => {
                    if mutated {
                        self.cache.invalidate(&AFTER_MOVE_MUTATION);
                    }
                    let resume = Resume {
                        kind: ResumeKind::Edit {
                            plan,
                            stage,
                            lock_token,
                        },
                        overrides,
                    };
                    return pause_or_fail(err, resume);
                }
            }
        }

        self.cache.invalidate(&AFTER_MOVE_MUTATION);
        Ok(SubmitOutcome::Updated {
            move_request_id: id,
        })
    }

    async fn run_bulk_assign(
        &self,
        payload: BulkAssignMoves,
    ) -> Result<SubmitOutcome, SubmitError> {
        match self.api.bulk_assign_moves(&payload).await {
            Ok(()) => {
                self.cache.invalidate(&AFTER_MOVE_MUTATION);
                Ok(SubmitOutcome::Assigned {
                    move_request_ids: payload.move_request_ids,
                })
            }
            Err(err) => {
                let overrides = payload.overrides;
                let resume = Resume {
                    kind: ResumeKind::BulkAssign { payload },
                    overrides,
                };
                pause_or_fail(err, resume)
            }
        }
    }

    /// Returns the new lock token.
    async fn update(
        &self,
        id: &str,
        update: &MoveRequestUpdate,
    ) -> Result<Option<i64>, ClientError> {
        self.api
            .update_move_request(id, update)
            .await
            .map(|updated| Some(updated.updated_at))
    }

    async fn assign(
        &self,
        move_request_id: &str,
        target: &AssignmentTarget,
        overrides: ConflictOverrides,
    ) -> Result<(), ClientError> {
        match target {
            AssignmentTarget::Unassigned => Ok(()),
            AssignmentTarget::User(user_id) => {
                self.api
                    .assign_move_to_user(&AssignToUser {
                        move_request_id: move_request_id.to_owned(),
                        user_id: user_id.clone(),
                        overrides,
                    })
                    .await
            }
            AssignmentTarget::Shift {
                shift_id,
                insertion,
            } => {
                self.api
                    .assign_move_to_shift(&AssignToShift {
                        move_request_id: move_request_id.to_owned(),
                        shift_id: shift_id.clone(),
                        insert_after_bin_id: insertion
                            .as_ref()
                            .and_then(ShiftInsertion::insert_after_bin_id),
                        insert_position: insertion
                            .as_ref()
                            .and_then(ShiftInsertion::insert_position),
                        overrides,
                    })
                    .await
            }
        }
    }
}

/// Promotes the two route conflicts to a pending operation; everything else
/// ends the submission.
fn pause_or_fail(err: ClientError, resume: Resume) -> Result<SubmitOutcome, SubmitError> {
    let pending = match classify_client_error(&err) {
        ErrorClass::InProgress(conflict) => {
            tracing::warn!(
                driver = conflict.driver_name.as_deref().unwrap_or("unknown"),
                stop = conflict.stop_label.as_deref().unwrap_or("unknown"),
                "bin is being serviced; confirmation required"
            );
            PendingOperation::InProgress { conflict, resume }
        }
        ErrorClass::ActiveShift => {
            tracing::warn!(error = %err, "shift is active; confirmation required");
            PendingOperation::ActiveShift {
                message: err.message(),
                resume,
            }
        }
        ErrorClass::Other => return Err(into_submit_error(err)),
    };
    Ok(SubmitOutcome::NeedsConfirmation(pending))
}

fn into_submit_error(err: ClientError) -> SubmitError {
    if is_stale_update(&err) {
        SubmitError::StaleUpdate {
            message: err.message(),
        }
    } else {
        SubmitError::Request(err)
    }
}
