use crate::entities::academic_year_setting;
use chrono::Utc;
use models::academic_year::{AcademicYearSetting, RegistrationWindow};
use sea_orm::{ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use uuid::Uuid;

pub struct AcademicYearService;

impl AcademicYearService {
    /// The most recently set term, if any has been configured
    pub async fn current(db: &DatabaseConnection) -> Result<Option<AcademicYearSetting>, DbErr> {
        let model = academic_year_setting::Entity::find()
            .order_by_desc(academic_year_setting::Column::SetAt)
            .one(db)
            .await?;

        Ok(model.map(setting_from_model))
    }

    /// Record a new current term. Earlier settings are kept as history.
    pub async fn set_current(
        db: &DatabaseConnection,
        academic_year: String,
        window: RegistrationWindow,
        set_by: Option<String>,
    ) -> Result<AcademicYearSetting, DbErr> {
        let model = academic_year_setting::Entity::insert(academic_year_setting::ActiveModel {
            id: Set(Uuid::new_v4()),
            academic_year: Set(academic_year),
            registration_start: Set(window.start),
            registration_end: Set(window.end),
            set_at: Set(Utc::now()),
            set_by: Set(set_by),
        })
        .exec_with_returning(db)
        .await?;

        Ok(setting_from_model(model))
    }
}

fn setting_from_model(model: academic_year_setting::Model) -> AcademicYearSetting {
    AcademicYearSetting {
        academic_year: model.academic_year,
        window: RegistrationWindow::new(model.registration_start, model.registration_end),
        set_at: model.set_at,
        set_by: model.set_by,
    }
}
