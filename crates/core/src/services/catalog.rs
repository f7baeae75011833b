use std::sync::Arc;

use tracing::info;

use crate::{
    errors::ClinicResult,
    models::catalog::{Consultation, LabTest, NewConsultation, NewLabTest},
    store::CatalogStore,
};

pub struct CatalogService<S: ?Sized> {
    store: Arc<S>,
}

impl<S> CatalogService<S>
where
    S: CatalogStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn consultations(&self) -> ClinicResult<Vec<Consultation>> {
        self.store.list_consultations().await
    }

    pub async fn add_consultation(&self, consultation: NewConsultation) -> ClinicResult<Consultation> {
        consultation.validate()?;
        let consultation = self.store.create_consultation(consultation).await?;
        info!("Added consultation {} ({})", consultation.docname, consultation.id);
        Ok(consultation)
    }

    pub async fn lab_tests(&self) -> ClinicResult<Vec<LabTest>> {
        self.store.list_lab_tests().await
    }

    pub async fn add_lab_test(&self, test: NewLabTest) -> ClinicResult<LabTest> {
        test.validate()?;
        let test = self.store.create_lab_test(test).await?;
        info!("Added lab test {} ({})", test.name, test.id);
        Ok(test)
    }
}
