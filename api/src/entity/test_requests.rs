use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "test_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_by: Uuid,
    pub name: String,
    pub gender: String,
    pub age: i32,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub pin_code: i32,
    pub status: String,
    pub tester_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl ActiveModelBehavior for ActiveModel {}
