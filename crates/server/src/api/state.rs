//! 统一的应用状态。

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AdminSiteConfig;
use crate::repository::{
    AnalyticsRepository, CatalogRepository, FormRepository, SeaOrmAnalyticsRepository,
    SeaOrmCatalogRepository, SeaOrmFormRepository, SeaOrmStudentRepository,
    SeaOrmSubmissionRepository, SeaOrmTeacherRepository, SeaOrmTemplateRepository,
    StudentRepository, SubmissionRepository, TeacherRepository, TemplateRepository,
};

/// 统一的应用状态，包含所有 handler 共享的仓储和配置。
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub teachers: Arc<dyn TeacherRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub forms: Arc<dyn FormRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub admin_site: AdminSiteConfig,
}

impl AppState {
    /// 基于数据库连接池创建应用状态。
    pub fn new(db: DatabaseConnection, admin_site: AdminSiteConfig) -> Self {
        Self {
            catalog: Arc::new(SeaOrmCatalogRepository::new(db.clone())),
            teachers: Arc::new(SeaOrmTeacherRepository::new(db.clone())),
            students: Arc::new(SeaOrmStudentRepository::new(db.clone())),
            templates: Arc::new(SeaOrmTemplateRepository::new(db.clone())),
            forms: Arc::new(SeaOrmFormRepository::new(db.clone())),
            submissions: Arc::new(SeaOrmSubmissionRepository::new(db.clone())),
            analytics: Arc::new(SeaOrmAnalyticsRepository::new(db)),
            admin_site,
        }
    }
}
