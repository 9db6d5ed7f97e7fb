//! Read-only lookups of shifts, route waypoints and users.

use binops_core::{Shift, ShiftDetails, User};

use crate::client::BinopsClient;
use crate::error::ClientError;

impl BinopsClient {
    /// Lists scheduled and active shifts.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-2xx answer.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the response shape is unexpected.
    pub async fn get_shifts(&self) -> Result<Vec<Shift>, ClientError> {
        let url = self.endpoint(&["api", "manager", "shifts"])?;
        self.get_json(url, "getShifts").await
    }

    /// Fetches the current route of the driver's shift.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_shifts`].
    pub async fn get_shift_details_by_driver_id(
        &self,
        driver_id: &str,
    ) -> Result<ShiftDetails, ClientError> {
        let url = self.endpoint(&["api", "manager", "shifts", "driver", driver_id])?;
        self.get_json(url, &format!("getShiftDetailsByDriverId(driver_id={driver_id})"))
            .await
    }

    /// Lists users that can take one-off assignments.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_shifts`].
    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        let url = self.endpoint(&["api", "users"])?;
        self.get_json(url, "getUsers").await
    }
}
