use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use appointments_core::appointment::Appointment;
use appointments_core::storage::{AppointmentExecer, AppointmentQuerier, RepositoryError, Result};

/// In-memory storage backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    appointments: Arc<RwLock<HashMap<String, Appointment>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut appointments: Vec<Appointment>) -> Vec<Appointment> {
        appointments.sort_by(|a, b| {
            a.appointment_date
                .cmp(&b.appointment_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        appointments
    }

    async fn filtered(&self, predicate: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let appointments = self.appointments.read().await;
        Self::sorted(
            appointments
                .values()
                .filter(|a| predicate(a))
                .cloned()
                .collect(),
        )
    }
}

#[async_trait]
impl AppointmentQuerier for InMemoryRepository {
    async fn find_all(&self) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Appointment> {
        let appointments = self.appointments.read().await;
        appointments
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::appointment_not_found(id))
    }

    async fn find_by_user_id(&self, user_id: i64) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|a| a.is_held_by(user_id)).await)
    }

    async fn find_by_salon_id(&self, salon_id: i64) -> Result<Vec<Appointment>> {
        Ok(self.filtered(|a| a.salon_id == salon_id).await)
    }

    async fn find_available(&self) -> Result<Vec<Appointment>> {
        Ok(self.filtered(Appointment::is_available).await)
    }
}

#[async_trait]
impl AppointmentExecer for InMemoryRepository {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        let created = appointment.clone().with_id(Uuid::new_v4().to_string());
        let mut appointments = self.appointments.write().await;
        appointments.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, appointment: &Appointment) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments
            .get_mut(id)
            .ok_or_else(|| RepositoryError::appointment_not_found(id))?;
        stored.user_id = appointment.user_id;
        stored.salon_id = appointment.salon_id;
        stored.appointment_date = appointment.appointment_date;
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut appointments = self.appointments.write().await;
        appointments
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::appointment_not_found(id))
    }

    async fn assign(&self, id: &str, user_id: i64) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments
            .get_mut(id)
            .ok_or_else(|| RepositoryError::appointment_not_found(id))?;
        stored.user_id = Some(user_id);
        Ok(stored.clone())
    }

    async fn cancel(&self, id: &str, user_id: i64) -> Result<Appointment> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments
            .get_mut(id)
            .ok_or_else(|| RepositoryError::appointment_not_found(id))?;
        if !stored.is_held_by(user_id) {
            return Err(RepositoryError::OwnershipMismatch {
                id: id.to_string(),
                user_id,
            });
        }
        stored.user_id = None;
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 6, day, 21, 12, 2).unwrap()
    }

    async fn seeded() -> (InMemoryRepository, Appointment, Appointment) {
        let repo = InMemoryRepository::new();
        let open = repo.create(&Appointment::new(1, date(23))).await.unwrap();
        let booked = repo
            .create(&Appointment::new(2, date(24)).with_user(7))
            .await
            .unwrap();
        (repo, open, booked)
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let repo = InMemoryRepository::new();
        let created = repo.create(&Appointment::new(1, date(23))).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(repo.find_by_id(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let repo = InMemoryRepository::new();
        let result = repo.find_by_id("missing").await;

        assert_eq!(result, Err(RepositoryError::appointment_not_found("missing")));
    }

    #[tokio::test]
    async fn test_filtered_queries() {
        let (repo, open, booked) = seeded().await;

        assert_eq!(repo.find_all().await.unwrap(), vec![open.clone(), booked.clone()]);
        assert_eq!(repo.find_by_user_id(7).await.unwrap(), vec![booked.clone()]);
        assert_eq!(repo.find_by_salon_id(1).await.unwrap(), vec![open.clone()]);
        assert_eq!(repo.find_available().await.unwrap(), vec![open]);
        assert!(repo.find_by_user_id(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_keeps_id() {
        let (repo, open, _) = seeded().await;

        let updated = repo
            .update(&open.id, &Appointment::new(5, date(30)).with_id("other"))
            .await
            .unwrap();

        assert_eq!(updated.id, open.id);
        assert_eq!(updated.salon_id, 5);
        assert_eq!(updated.appointment_date, date(30));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryRepository::new();
        let result = repo.update("missing", &Appointment::new(1, date(23))).await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (repo, open, _) = seeded().await;

        assert!(repo.delete(&open.id).await.is_ok());
        assert!(matches!(
            repo.delete(&open.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
        assert!(matches!(
            repo.delete("never-existed").await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_assign_and_cancel() {
        let (repo, open, _) = seeded().await;

        let booked = repo.assign(&open.id, 9).await.unwrap();
        assert_eq!(booked.user_id, Some(9));

        let released = repo.cancel(&open.id, 9).await.unwrap();
        assert_eq!(released.user_id, None);
    }

    #[tokio::test]
    async fn test_cancel_by_other_user_leaves_record() {
        let (repo, _, booked) = seeded().await;

        let result = repo.cancel(&booked.id, 8).await;

        assert_eq!(
            result,
            Err(RepositoryError::OwnershipMismatch {
                id: booked.id.clone(),
                user_id: 8,
            })
        );
        assert_eq!(repo.find_by_id(&booked.id).await.unwrap(), booked);
    }

    #[tokio::test]
    async fn test_cancel_missing() {
        let repo = InMemoryRepository::new();
        assert!(matches!(
            repo.cancel("missing", 1).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
