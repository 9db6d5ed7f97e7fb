//! Move-request endpoints.

use binops_core::{MoveRequest, MoveStatus};
use reqwest::{Method, Url};

use crate::client::BinopsClient;
use crate::error::ClientError;
use crate::types::{
    AssignToShift, AssignToUser, BulkAssignMoves, CancelMoveRequest, CreateMoveRequest,
    MoveRequestUpdate,
};

impl BinopsClient {
    fn move_request_endpoint(&self, tail: &[&str]) -> Result<Url, ClientError> {
        let mut segments: Vec<&str> = vec!["api", "manager", "move-requests"];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    /// Creates a move request and returns the stored record.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the request.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn create_move_request(
        &self,
        payload: &CreateMoveRequest,
    ) -> Result<MoveRequest, ClientError> {
        let url = self.move_request_endpoint(&[])?;
        let created: MoveRequest = self
            .send_json(Method::POST, url, payload, "createMoveRequest")
            .await?;
        tracing::info!(
            move_request_id = %created.id,
            bin_id = %payload.bin_id,
            "move request created"
        );
        Ok(created)
    }

    /// Fetches a single move request.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_move_request`].
    pub async fn get_move_request(&self, id: &str) -> Result<MoveRequest, ClientError> {
        let url = self.move_request_endpoint(&[id])?;
        self.get_json(url, &format!("getMoveRequest(id={id})")).await
    }

    /// Lists move requests, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_move_request`].
    pub async fn list_move_requests(
        &self,
        status: Option<MoveStatus>,
    ) -> Result<Vec<MoveRequest>, ClientError> {
        let mut url = self.move_request_endpoint(&[])?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        self.get_json(url, "getMoveRequests").await
    }

    /// Applies a partial update. A stale `client_updated_at` or a live-route
    /// conflict comes back as [`ClientError::Api`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_move_request`].
    pub async fn update_move_request(
        &self,
        id: &str,
        update: &MoveRequestUpdate,
    ) -> Result<MoveRequest, ClientError> {
        let url = self.move_request_endpoint(&[id])?;
        let updated: MoveRequest = self
            .send_json(
                Method::PUT,
                url,
                update,
                &format!("updateMoveRequest(id={id})"),
            )
            .await?;
        tracing::info!(
            move_request_id = %id,
            updated_at = updated.updated_at,
            "move request updated"
        );
        Ok(updated)
    }

    /// Cancels a move request with an operator-supplied reason.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the cancellation.
    /// - [`ClientError::Http`] on network failure.
    pub async fn cancel_move_request(&self, id: &str, reason: &str) -> Result<(), ClientError> {
        let url = self.move_request_endpoint(&[id, "cancel"])?;
        let payload = CancelMoveRequest {
            reason: reason.to_owned(),
        };
        self.send_unit(
            Method::POST,
            url,
            &payload,
            &format!("cancelMoveRequest(id={id})"),
        )
        .await?;
        tracing::info!(move_request_id = %id, "move request cancelled");
        Ok(())
    }

    /// Assigns a move request to a single user as a one-off task.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the assignment.
    /// - [`ClientError::Http`] on network failure.
    pub async fn assign_move_to_user(&self, payload: &AssignToUser) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "manager", "assign-move-to-user"])?;
        self.send_unit(Method::POST, url, payload, "assignMoveToUser")
            .await?;
        tracing::info!(
            move_request_id = %payload.move_request_id,
            user_id = %payload.user_id,
            "move request assigned to user"
        );
        Ok(())
    }

    /// Inserts a move request into a shift's route.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the insertion.
    /// - [`ClientError::Http`] on network failure.
    pub async fn assign_move_to_shift(&self, payload: &AssignToShift) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "manager", "assign-move-to-shift"])?;
        self.send_unit(Method::POST, url, payload, "assignMoveToShift")
            .await?;
        tracing::info!(
            move_request_id = %payload.move_request_id,
            shift_id = %payload.shift_id,
            "move request assigned to shift"
        );
        Ok(())
    }

    /// Inserts several move requests into one shift's route in a single call.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] if the backend rejects the batch.
    /// - [`ClientError::Http`] on network failure.
    pub async fn bulk_assign_moves(&self, payload: &BulkAssignMoves) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "manager", "bulk-assign-moves"])?;
        self.send_unit(Method::POST, url, payload, "bulkAssignMoves")
            .await?;
        tracing::info!(
            count = payload.move_request_ids.len(),
            shift_id = %payload.shift_id,
            "move requests bulk-assigned to shift"
        );
        Ok(())
    }
}
