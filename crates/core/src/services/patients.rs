use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{ClinicError, ClinicResult},
    models::patient::{DashboardStats, NewPatient, Patient, PatientUpdate},
    store::{CatalogStore, PatientStore},
};

pub const RECENT_PATIENTS: i64 = 5;

pub struct PatientService<S: ?Sized> {
    store: Arc<S>,
}

impl<S> PatientService<S>
where
    S: PatientStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ClinicResult<Vec<Patient>> {
        self.store.list_patients().await
    }

    pub async fn create(&self, patient: NewPatient) -> ClinicResult<Patient> {
        patient.validate()?;
        let patient = self.store.create_patient(patient).await?;
        info!("Created patient {}", patient.id);
        Ok(patient)
    }

    pub async fn get(&self, id: Uuid) -> ClinicResult<Patient> {
        self.store
            .find_patient(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: Uuid, update: PatientUpdate) -> ClinicResult<Patient> {
        update.validate()?;
        self.store
            .update_patient(id, update)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        if !self.store.delete_patient(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted patient {}", id);
        Ok(())
    }
}

impl<S> PatientService<S>
where
    S: PatientStore + CatalogStore + ?Sized,
{
    pub async fn dashboard(&self) -> ClinicResult<DashboardStats> {
        Ok(DashboardStats {
            total_patients: self.store.count_patients().await?,
            total_consultations: self.store.count_consultations().await?,
            total_tests: self.store.count_lab_tests().await?,
            recent_patients: self.store.recent_patients(RECENT_PATIENTS).await?,
        })
    }
}

fn not_found(id: Uuid) -> ClinicError {
    ClinicError::NotFound(format!("Patient with ID {} not found", id))
}
