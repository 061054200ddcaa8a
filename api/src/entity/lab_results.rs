use sea_orm::entity::prelude::*;

/// One row per test request; the request id is the primary key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub request_id: i64,
    pub blood_pressure: String,
    pub heart_beat: String,
    pub temperature: String,
    pub oxygen_level: String,
    pub comments: String,
    pub result: String,
    pub tester_id: Uuid,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_requests::Entity",
        from = "Column::RequestId",
        to = "super::test_requests::Column::Id"
    )]
    TestRequest,
}

impl ActiveModelBehavior for ActiveModel {}
