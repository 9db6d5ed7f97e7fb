//! The backend operations the editor depends on.

use binops_client::{
    AssignToShift, AssignToUser, BinopsClient, BulkAssignMoves, ClientError, CreateMoveRequest,
    MoveRequestUpdate,
};
use binops_core::{MoveRequest, ShiftDetails};

/// Backend calls made while reconciling move requests.
///
/// Implemented by [`BinopsClient`]; tests substitute a recording fake.
#[allow(async_fn_in_trait)]
pub trait MoveRequestApi {
    async fn create_move_request(
        &self,
        payload: &CreateMoveRequest,
    ) -> Result<MoveRequest, ClientError>;

    async fn update_move_request(
        &self,
        id: &str,
        update: &MoveRequestUpdate,
    ) -> Result<MoveRequest, ClientError>;

    async fn assign_move_to_user(&self, payload: &AssignToUser) -> Result<(), ClientError>;

    async fn assign_move_to_shift(&self, payload: &AssignToShift) -> Result<(), ClientError>;

    async fn bulk_assign_moves(&self, payload: &BulkAssignMoves) -> Result<(), ClientError>;

    async fn cancel_move_request(&self, id: &str, reason: &str) -> Result<(), ClientError>;

    async fn get_shift_details_by_driver_id(
        &self,
        driver_id: &str,
    ) -> Result<ShiftDetails, ClientError>;
}

impl MoveRequestApi for BinopsClient {
    async fn create_move_request(
        &self,
        payload: &CreateMoveRequest,
    ) -> Result<MoveRequest, ClientError> {
        BinopsClient::create_move_request(self, payload).await
    }

    async fn update_move_request(
        &self,
        id: &str,
        update: &MoveRequestUpdate,
    ) -> Result<MoveRequest, ClientError> {
        BinopsClient::update_move_request(self, id, update).await
    }

    async fn assign_move_to_user(&self, payload: &AssignToUser) -> Result<(), ClientError> {
        BinopsClient::assign_move_to_user(self, payload).await
    }

    async fn assign_move_to_shift(&self, payload: &AssignToShift) -> Result<(), ClientError> {
        BinopsClient::assign_move_to_shift(self, payload).await
    }

    async fn bulk_assign_moves(&self, payload: &BulkAssignMoves) -> Result<(), ClientError> {
        BinopsClient::bulk_assign_moves(self, payload).await
    }

    async fn cancel_move_request(&self, id: &str, reason: &str) -> Result<(), ClientError> {
        BinopsClient::cancel_move_request(self, id, reason).await
    }

    async fn get_shift_details_by_driver_id(
        &self,
        driver_id: &str,
    ) -> Result<ShiftDetails, ClientError> {
        BinopsClient::get_shift_details_by_driver_id(self, driver_id).await
    }
}
