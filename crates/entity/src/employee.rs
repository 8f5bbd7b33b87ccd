use sea_orm::entity::prelude::*;

/// One staff member. `employee_id` is the business key printed on badges
/// and payroll exports; `id` stays internal.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[sea_orm(indexed)]
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_cents: Option<i64>,
    pub hire_date: DateTimeWithTimeZone,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
