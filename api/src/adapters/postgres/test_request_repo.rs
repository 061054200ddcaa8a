//! PostgreSQL adapter for TestRequestRepository
//!
//! Lab results and consultations live in their own tables keyed by the
//! request id and are loaded alongside every request.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::parse_column;
use crate::domain::entities::{
    Consultation, LabResult, NewTestRequest, RequestStatus, StatusChange, TestRequest,
    TestRequestId, UserId,
};
use crate::domain::ports::TestRequestRepository;
use crate::entity::{consultations, lab_results, test_requests};
use crate::error::DomainError;

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// PostgreSQL implementation of TestRequestRepository
pub struct PostgresTestRequestRepository {
    db: DatabaseConnection,
}

impl PostgresTestRequestRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_all(
        &self,
        query: Select<test_requests::Entity>,
    ) -> Result<Vec<TestRequest>, DomainError> {
        let models = query
            .order_by_asc(test_requests::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        hydrate(&self.db, models).await
    }
}

/// Attach lab results and consultations to request rows
async fn hydrate<C>(
    conn: &C,
    models: Vec<test_requests::Model>,
) -> Result<Vec<TestRequest>, DomainError>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = models.iter().map(|m| m.id).collect();

    let mut labs: HashMap<i64, lab_results::Model> = lab_results::Entity::find()
        .filter(lab_results::Column::RequestId.is_in(ids.clone()))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.request_id, m))
        .collect();

    let mut consults: HashMap<i64, consultations::Model> = consultations::Entity::find()
        .filter(consultations::Column::RequestId.is_in(ids))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|m| (m.request_id, m))
        .collect();

    models
        .into_iter()
        .map(|m| {
            let lab = labs.remove(&m.id);
            let consultation = consults.remove(&m.id);
            to_domain(m, lab, consultation)
        })
        .collect()
}

/// Oldest request that is still in progress with the given email or phone number
async fn find_active_by_contact<C>(
    conn: &C,
    email: &str,
    phone_number: &str,
) -> Result<Option<test_requests::Model>, DomainError>
where
    C: ConnectionTrait,
{
    test_requests::Entity::find()
        .filter(
            test_requests::Column::Status
                .is_in(RequestStatus::active().map(|status| status.to_string())),
        )
        .filter(
            Condition::any()
                .add(test_requests::Column::Email.eq(email))
                .add(test_requests::Column::PhoneNumber.eq(phone_number)),
        )
        .order_by_asc(test_requests::Column::Id)
        .one(conn)
        .await
        .map_err(db_err)
}

fn to_domain(
    model: test_requests::Model,
    lab: Option<lab_results::Model>,
    consultation: Option<consultations::Model>,
) -> Result<TestRequest, DomainError> {
    let lab_result = lab
        .map(|l| -> Result<LabResult, DomainError> {
            Ok(LabResult {
                blood_pressure: l.blood_pressure,
                heart_beat: l.heart_beat,
                temperature: l.temperature,
                oxygen_level: l.oxygen_level,
                comments: l.comments,
                result: parse_column(&l.result)?,
                tester_id: UserId(l.tester_id),
                updated_at: l.updated_at.with_timezone(&Utc),
            })
        })
        .transpose()?;

    let consultation = consultation
        .map(|c| -> Result<Consultation, DomainError> {
            Ok(Consultation {
                suggestion: parse_column(&c.suggestion)?,
                comments: c.comments,
                doctor_id: UserId(c.doctor_id),
                updated_at: c.updated_at.with_timezone(&Utc),
            })
        })
        .transpose()?;

    Ok(TestRequest {
        request_id: TestRequestId(model.id),
        created_by: UserId(model.created_by),
        name: model.name,
        gender: parse_column(&model.gender)?,
        age: model.age,
        email: model.email,
        phone_number: model.phone_number,
        address: model.address,
        pin_code: model.pin_code,
        status: parse_column(&model.status)?,
        tester_id: model.tester_id.map(UserId),
        doctor_id: model.doctor_id.map(UserId),
        lab_result,
        consultation,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

#[async_trait]
impl TestRequestRepository for PostgresTestRequestRepository {
    async fn find_by_id(&self, id: &TestRequestId) -> Result<Option<TestRequest>, DomainError> {
        let result = test_requests::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match result {
            Some(model) => Ok(hydrate(&self.db, vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<TestRequest>, DomainError> {
        self.fetch_all(
            test_requests::Entity::find()
                .filter(test_requests::Column::Status.eq(status.to_string())),
        )
        .await
    }

    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        self.fetch_all(
            test_requests::Entity::find().filter(test_requests::Column::CreatedBy.eq(user_id.0)),
        )
        .await
    }

    async fn find_by_tester(&self, tester_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        self.fetch_all(
            test_requests::Entity::find().filter(test_requests::Column::TesterId.eq(tester_id.0)),
        )
        .await
    }

    async fn find_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<TestRequest>, DomainError> {
        self.fetch_all(
            test_requests::Entity::find().filter(test_requests::Column::DoctorId.eq(doctor_id.0)),
        )
        .await
    }

    async fn create(&self, request: &NewTestRequest) -> Result<TestRequest, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Serializes registrations so the contact check below cannot race an insert
        txn.execute_unprepared("LOCK TABLE test_requests IN SHARE ROW EXCLUSIVE MODE")
            .await
            .map_err(db_err)?;

        if let Some(existing) =
            find_active_by_contact(&txn, &request.email, &request.phone_number).await?
        {
            return Err(DomainError::contact_in_use(TestRequestId(existing.id)));
        }

        let model = test_requests::ActiveModel {
            id: NotSet,
            created_by: Set(request.created_by.0),
            name: Set(request.name.clone()),
            gender: Set(request.gender.to_string()),
            age: Set(request.age),
            email: Set(request.email.clone()),
            phone_number: Set(request.phone_number.clone()),
            address: Set(request.address.clone()),
            pin_code: Set(request.pin_code),
            status: Set(RequestStatus::Initiated.to_string()),
            tester_id: Set(None),
            doctor_id: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        to_domain(result, None, None)
    }

    async fn apply_change(
        &self,
        id: &TestRequestId,
        change: &StatusChange,
    ) -> Result<Option<TestRequest>, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock held until commit; dropping txn on any early return rolls back
        let Some(model) = test_requests::Entity::find_by_id(id.0)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let mut request = hydrate(&txn, vec![model.clone()])
            .await?
            .pop()
            .ok_or_else(|| DomainError::Internal(format!("Request {} vanished", id)))?;
        request.apply(change)?;

        let mut active: test_requests::ActiveModel = model.into();
        active.status = Set(request.status.to_string());

        match change {
            StatusChange::AssignLabTest { tester } => active.tester_id = Set(Some(tester.0)),
            StatusChange::AssignConsultation { doctor } => active.doctor_id = Set(Some(doctor.0)),
            StatusChange::CompleteLabTest(_) => {
                if let Some(lab) = &request.lab_result {
                    lab_results::ActiveModel {
                        request_id: Set(id.0),
                        blood_pressure: Set(lab.blood_pressure.clone()),
                        heart_beat: Set(lab.heart_beat.clone()),
                        temperature: Set(lab.temperature.clone()),
                        oxygen_level: Set(lab.oxygen_level.clone()),
                        comments: Set(lab.comments.clone()),
                        result: Set(lab.result.to_string()),
                        tester_id: Set(lab.tester_id.0),
                        updated_at: Set(lab.updated_at.fixed_offset()),
                    }
                    .insert(&txn)
                    .await
                    .map_err(db_err)?;
                }
            }
            StatusChange::CompleteConsultation(_) => {
                if let Some(consultation) = &request.consultation {
                    consultations::ActiveModel {
                        request_id: Set(id.0),
                        suggestion: Set(consultation.suggestion.to_string()),
                        comments: Set(consultation.comments.clone()),
                        doctor_id: Set(consultation.doctor_id.0),
                        updated_at: Set(consultation.updated_at.fixed_offset()),
                    }
                    .insert(&txn)
                    .await
                    .map_err(db_err)?;
                }
            }
        }

        active.update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Ok(Some(request))
    }
}
