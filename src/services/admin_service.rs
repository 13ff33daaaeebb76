use serde_json::json;

use crate::error::Result;
use crate::models::admin::{CreateAdminDto, DashboardStats, UpdateUserDto};
use crate::models::user::User;
use crate::services::api_client::ApiClient;
use crate::utils::validation::validate;

#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_admins(&self) -> Result<Vec<User>> {
        self.api.get("/Admin/admins").await
    }

    pub async fn get_all_students(&self) -> Result<Vec<User>> {
        self.api.get("/Admin/students").await
    }

    pub async fn get_user(&self, id: i32) -> Result<User> {
        self.api.get(&format!("/Admin/user/{}", id)).await
    }

    pub async fn create_admin(&self, dto: &CreateAdminDto) -> Result<User> {
        validate(dto)?;
        self.api.post("/Admin/create-admin", dto).await
    }

    pub async fn update_user(&self, id: i32, dto: &UpdateUserDto) -> Result<User> {
        validate(dto)?;
        self.api.put(&format!("/Admin/user/{}", id), dto).await
    }

    pub async fn delete_user(&self, id: i32) -> Result<bool> {
        self.api.delete(&format!("/Admin/user/{}", id)).await
    }

    pub async fn toggle_user_status(&self, id: i32) -> Result<bool> {
        self.api
            .patch(&format!("/Admin/user/{}/toggle-status", id), &json!({}))
            .await
    }

    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.api.get("/Admin/dashboard-stats").await
    }
}
