use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, ID, InputObject, Object, Schema,
    SimpleObject,
};
use chrono::{DateTime, Local, Utc};
use entity::employee;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::info_span;
use uuid::Uuid;

use crate::dashboard::{self, WelcomePanel};

pub struct AppSchema(pub Schema<QueryRoot, MutationRoot, EmptySubscription>);

pub fn build_schema(db: Arc<DatabaseConnection>) -> AppSchema {
    let schema = Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish();
    AppSchema(schema)
}

pub struct QueryRoot;
pub struct MutationRoot;

const MAX_EMPLOYEES_PAGE: i32 = 200;

#[Object]
impl QueryRoot {
    async fn hr(&self) -> HrQuery {
        HrQuery
    }
}

#[Object]
impl MutationRoot {
    async fn hr(&self) -> HrMutation {
        HrMutation
    }
}

#[derive(Default)]
pub struct HrQuery;

#[derive(Default)]
pub struct HrMutation;

#[Object]
impl HrQuery {
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&id)?;
        let record = employee::Entity::find_by_id(employee_id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(record.map(EmployeeNode::from))
    }

    async fn employee_by_employee_id(
        &self,
        ctx: &Context<'_>,
        employee_id: String,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let db = database(ctx)?;
        let needle = employee_id.trim();
        if needle.is_empty() {
            return Err(validation_error("employeeId cannot be empty"));
        }
        let record = employee::Entity::find()
            .filter(employee::Column::EmployeeId.eq(needle))
            .one(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(record.map(EmployeeNode::from))
    }

    async fn employees(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        offset: Option<i32>,
        q: Option<String>,
        department: Option<String>,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let db = database(ctx)?;
        let requested = first.unwrap_or(50);
        let limit = enforce_page_limit(requested)?;
        let skip = offset.unwrap_or(0).max(0) as u64;
        let filter = sanitize_optional_filter(q);
        let dept = sanitize_optional_filter(department);
        let span = info_span!(
            "hr.employees.list",
            has_q = filter.is_some(),
            department = dept.as_deref().unwrap_or(""),
            first = requested
        );
        let _guard = span.enter();

        let mut query = employee::Entity::find();
        if let Some(filter) = &filter {
            let pattern = format!("%{}%", filter.to_lowercase());
            let condition = Condition::any()
                .add(lowered(employee::Column::EmployeeId).like(pattern.clone()))
                .add(lowered(employee::Column::FirstName).like(pattern.clone()))
                .add(lowered(employee::Column::LastName).like(pattern.clone()))
                .add(lowered(employee::Column::Email).like(pattern));
            query = query.filter(condition);
        }
        if let Some(dept) = dept {
            query = query.filter(employee::Column::Department.eq(dept));
        }
        let rows = query
            .order_by_asc(employee::Column::LastName)
            .order_by_asc(employee::Column::FirstName)
            .limit(limit)
            .offset(skip)
            .all(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(rows.into_iter().map(EmployeeNode::from).collect())
    }

    async fn dashboard(
        &self,
        first_name: Option<String>,
    ) -> async_graphql::Result<DashboardPayload> {
        Ok(dashboard::render(first_name.as_deref(), Local::now()).into())
    }
}

#[Object]
impl HrMutation {
    async fn create_employee(
        &self,
        ctx: &Context<'_>,
        input: NewEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let employee_id = validate_required("employeeId", &input.employee_id)?;
        let first_name = validate_required("firstName", &input.first_name)?;
        let last_name = validate_required("lastName", &input.last_name)?;
        let email = normalize_email(&input.email)?;
        let salary_cents = validate_salary(input.salary_cents)?;
        ensure_unique(db.as_ref(), &employee_id, &email, None).await?;

        let id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = Utc::now().into();
        let hire_date = input.hire_date.map(Into::into).unwrap_or(now);
        let active = employee::ActiveModel {
            id: Set(id),
            employee_id: Set(employee_id),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            phone: Set(clean_optional(input.phone)),
            address: Set(clean_optional(input.address)),
            department: Set(clean_optional(input.department)),
            position: Set(clean_optional(input.position)),
            salary_cents: Set(salary_cents),
            hire_date: Set(hire_date),
            emergency_contact: Set(clean_optional(input.emergency_contact)),
            emergency_phone: Set(clean_optional(input.emergency_phone)),
            user_id: Set(clean_optional(input.user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        employee::Entity::insert(active)
            .exec_without_returning(db.as_ref())
            .await
            .map_err(write_error)?;
        let record = employee::Entity::find_by_id(id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("INTERNAL", "Failed to load new employee"))?;
        Ok(record.into())
    }

    async fn update_employee(
        &self,
        ctx: &Context<'_>,
        input: UpdateEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let id = parse_uuid(&input.id)?;
        let existing = employee::Entity::find_by_id(id)
            .one(db.as_ref())
            .await
            .map_err(db_error)?
            .ok_or_else(|| error_with_code("NOT_FOUND", "Employee not found"))?;

        let employee_id = match &input.employee_id {
            Some(value) => validate_required("employeeId", value)?,
            None => existing.employee_id.clone(),
        };
        let email = match &input.email {
            Some(value) => normalize_email(value)?,
            None => existing.email.clone(),
        };
        if employee_id != existing.employee_id || email != existing.email {
            ensure_unique(db.as_ref(), &employee_id, &email, Some(id)).await?;
        }

        let mut active: employee::ActiveModel = existing.into();
        active.employee_id = Set(employee_id);
        active.email = Set(email);
        if let Some(first_name) = &input.first_name {
            active.first_name = Set(validate_required("firstName", first_name)?);
        }
        if let Some(last_name) = &input.last_name {
            active.last_name = Set(validate_required("lastName", last_name)?);
        }
        if input.phone.is_some() {
            active.phone = Set(clean_optional(input.phone));
        }
        if input.address.is_some() {
            active.address = Set(clean_optional(input.address));
        }
        if input.department.is_some() {
            active.department = Set(clean_optional(input.department));
        }
        if input.position.is_some() {
            active.position = Set(clean_optional(input.position));
        }
        if input.salary_cents.is_some() {
            active.salary_cents = Set(validate_salary(input.salary_cents)?);
        }
        if let Some(hire_date) = input.hire_date {
            active.hire_date = Set(hire_date.into());
        }
        if input.emergency_contact.is_some() {
            active.emergency_contact = Set(clean_optional(input.emergency_contact));
        }
        if input.emergency_phone.is_some() {
            active.emergency_phone = Set(clean_optional(input.emergency_phone));
        }
        if input.user_id.is_some() {
            active.user_id = Set(clean_optional(input.user_id));
        }
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(db.as_ref()).await.map_err(write_error)?;
        Ok(updated.into())
    }

    async fn delete_employee(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let db = database(ctx)?;
        let employee_id = parse_uuid(&id)?;
        let result = employee::Entity::delete_by_id(employee_id)
            .exec(db.as_ref())
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected > 0)
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct EmployeeNode {
    pub id: ID,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_cents: Option<i64>,
    pub hire_date: DateTime<Utc>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: ID(model.id.to_string()),
            employee_id: model.employee_id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            department: model.department,
            position: model.position,
            salary_cents: model.salary_cents,
            hire_date: model.hire_date.with_timezone(&Utc),
            emergency_contact: model.emergency_contact,
            emergency_phone: model.emergency_phone,
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct DashboardPayload {
    pub greeting: String,
    pub current_date: String,
    pub current_time: String,
}

impl From<WelcomePanel> for DashboardPayload {
    fn from(panel: WelcomePanel) -> Self {
        Self {
            greeting: panel.greeting,
            current_date: panel.date_display,
            current_time: panel.time_display,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct NewEmployeeInput {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_cents: Option<i64>,
    pub hire_date: Option<DateTime<Utc>>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateEmployeeInput {
    pub id: ID,
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary_cents: Option<i64>,
    pub hire_date: Option<DateTime<Utc>>,
    pub emergency_contact: Option<String>,
    pub emergency_phone: Option<String>,
    pub user_id: Option<String>,
}

fn database(ctx: &Context<'_>) -> async_graphql::Result<Arc<DatabaseConnection>> {
    ctx.data::<Arc<DatabaseConnection>>()
        .map(Arc::clone)
        .map_err(|_| error_with_code("INTERNAL", "Database handle missing from context"))
}

fn parse_uuid(id: &ID) -> async_graphql::Result<Uuid> {
    Uuid::parse_str(id.as_str()).map_err(|_| error_with_code("BAD_REQUEST", "Invalid ID"))
}

fn db_error(err: DbErr) -> Error {
    error_with_code("INTERNAL", format!("Database error: {}", err))
}

/// Write-path variant of [`db_error`]: a unique-index race that slipped
/// past the pre-insert check still surfaces as a conflict.
fn write_error(err: DbErr) -> Error {
    if is_unique_violation(&err) {
        error_with_code("CONFLICT", "employeeId or email already in use")
    } else {
        db_error(err)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    // Postgres says "duplicate key value violates unique constraint",
    // sqlite says "UNIQUE constraint failed".
    err.to_string().to_ascii_lowercase().contains("unique")
}

fn error_with_code(code: &'static str, message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}

fn validation_error(message: impl Into<String>) -> Error {
    error_with_code("VALIDATION", message)
}

fn validate_required(field: &str, value: &str) -> async_graphql::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(value: &str) -> async_graphql::Result<String> {
    let trimmed = value.trim().to_lowercase();
    let valid = matches!(
        trimmed.split_once('@'),
        Some((local, domain)) if !local.is_empty() && domain.contains('.')
    );
    if !valid {
        return Err(validation_error("email is not a valid address"));
    }
    Ok(trimmed)
}

fn validate_salary(value: Option<i64>) -> async_graphql::Result<Option<i64>> {
    if let Some(cents) = value {
        if cents < 0 {
            return Err(validation_error("salaryCents cannot be negative"));
        }
    }
    Ok(value)
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn sanitize_optional_filter(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn enforce_page_limit(requested: i32) -> async_graphql::Result<u64> {
    if requested > MAX_EMPLOYEES_PAGE {
        return Err(error_with_code(
            "LIMIT_EXCEEDED",
            format!("first cannot exceed {}", MAX_EMPLOYEES_PAGE),
        ));
    }
    Ok(requested.max(0) as u64)
}

fn lowered(col: employee::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(col)))
}

async fn ensure_unique(
    db: &DatabaseConnection,
    employee_id: &str,
    email: &str,
    exclude: Option<Uuid>,
) -> async_graphql::Result<()> {
    let mut query = employee::Entity::find().filter(
        Condition::any()
            .add(employee::Column::EmployeeId.eq(employee_id))
            .add(employee::Column::Email.eq(email)),
    );
    if let Some(id) = exclude {
        query = query.filter(employee::Column::Id.ne(id));
    }
    let Some(found) = query.one(db).await.map_err(db_error)? else {
        return Ok(());
    };
    if found.employee_id == employee_id {
        Err(error_with_code("CONFLICT", "employeeId already in use"))
    } else {
        Err(error_with_code("CONFLICT", "email already in use"))
    }
}

#[derive(Debug, Clone)]
pub struct SeededHrRecords {
    pub employees: Vec<employee::Model>,
}

impl SeededHrRecords {
    pub fn by_employee_id(&self, employee_id: &str) -> Option<&employee::Model> {
        self.employees
            .iter()
            .find(|e| e.employee_id == employee_id)
    }
}

/// Insert demo employees for local development and tests.
pub async fn seed_hr_demo(db: &DatabaseConnection) -> Result<SeededHrRecords, DbErr> {
    let seeded_at: DateTimeWithTimeZone = Utc::now().into();
    let fixtures = [
        (
            "EMP-0001",
            "Asha",
            "Rao",
            "asha.rao@peopledesk.test",
            Some("Engineering"),
            Some("Staff Engineer"),
            Some(14_500_000_i64),
        ),
        (
            "EMP-0002",
            "Marcus",
            "Webb",
            "marcus.webb@peopledesk.test",
            Some("Finance"),
            Some("Payroll Analyst"),
            Some(8_200_000),
        ),
        (
            "EMP-0003",
            "Ines",
            "Duarte",
            "ines.duarte@peopledesk.test",
            None,
            None,
            None,
        ),
    ];
    let mut employees = Vec::with_capacity(fixtures.len());
    for (employee_id, first, last, email, department, position, salary) in fixtures {
        let model = employee::ActiveModel {
            id: Set(Uuid::new_v4()),
            employee_id: Set(employee_id.into()),
            first_name: Set(first.into()),
            last_name: Set(last.into()),
            email: Set(email.into()),
            phone: Set(None),
            address: Set(None),
            department: Set(department.map(Into::into)),
            position: Set(position.map(Into::into)),
            salary_cents: Set(salary),
            hire_date: Set(seeded_at),
            emergency_contact: Set(None),
            emergency_phone: Set(None),
            user_id: Set(None),
            created_at: Set(seeded_at),
            updated_at: Set(seeded_at),
        }
        .insert(db)
        .await?;
        employees.push(model);
    }
    Ok(SeededHrRecords { employees })
}
