use utoipa::OpenApi;

use super::{dsd, panels, resources};
use crate::models::{FileType, UpdateResponse, ValidationReport, Warning, WarningKind};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DSD API",
        description = "Filtered access to classes, professors and the teaching service distribution"
    ),
    tags(
        (name = "Classes", description = "Classes and professor assignment"),
        (name = "Departments"),
        (name = "Professors", description = "Professors and acronym updates"),
        (name = "Dsders"),
        (name = "Courses"),
        (name = "Ucs", description = "Curricular units"),
        (name = "Wishlists"),
        (name = "Panels", description = "Precomputed views for the main panels"),
        (name = "DSD", description = "Validation and export")
    ),
    paths(
        resources::get_classes,
        resources::get_departments,
        resources::get_professors,
        resources::get_dsders,
        resources::get_courses,
        resources::get_ucs,
        resources::get_wishlists,
        resources::assign_prof_to_class,
        resources::update_prof_acronym,
        panels::classes_main_panel_info,
        panels::professors_main_panel_info,
        panels::prof_total_hours,
        dsd::validate_dsd,
        dsd::export_dsd,
    ),
    components(schemas(UpdateResponse, ValidationReport, Warning, WarningKind, FileType))
)]
pub struct ApiDoc;
