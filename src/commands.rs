use std::path::Path;

use crate::{AppContext, OutputMode, emit_success};
use coursebook::catalog::{CatalogController, CatalogEffect, MenuAction};
use coursebook::config::{self, CoursebookConfig};
use coursebook::editor::{EditorController, EditorMode, Field, Leave, Notice};
use coursebook::ui::{self, Icons, TableBuilder};
use coursebook::Course;
use owo_colors::OwoColorize;

/// Ask a yes/no question on the terminal; refuses when there is no terminal
fn confirm(question: &str) -> anyhow::Result<bool> {
    let term = console::Term::stderr();
    if !term.is_term() {
        anyhow::bail!("{} needs confirmation (pass --yes to skip the prompt)", question);
    }
    term.write_str(&format!("{} {} [y/N] ", Icons::WARN, question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Report an editor notice; failures become the command's error
fn finish_with_notice(output_mode: OutputMode, command: &str, notice: Notice) -> anyhow::Result<()> {
    if !notice.is_success() {
        anyhow::bail!("{}", notice);
    }
    if output_mode.is_human() {
        ui::notice(&notice);
    }
    let id = match notice {
        Notice::Inserted(id) => Some(id),
        _ => None,
    };
    emit_success(output_mode, command, serde_json::json!({ "message": notice.to_string(), "id": id }))
}

fn print_summary(output_mode: OutputMode, catalog: &CatalogController) {
    if output_mode.is_human() {
        ui::summary_line(catalog.summary());
    }
}

pub fn run_init(output_mode: OutputMode, path: &Path, database: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let config = CoursebookConfig {
        database: Some(
            database
                .map(Path::to_path_buf)
                .unwrap_or_else(|| config::default_database_path_in(Path::new(".")))
                .to_string_lossy()
                .to_string(),
        ),
        ..Default::default()
    };
    config::write_config(path, &config, force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote config to {}", path.display()));
    }
    emit_success(output_mode, "init", serde_json::json!({ "config": path.display().to_string() }))
}

pub fn run_list(output_mode: OutputMode, ctx: &AppContext) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    catalog.activate();
    catalog.wait()?;

    if output_mode.is_human() {
        ui::header("Courses");
        ui::status(Icons::DATABASE, "Database", &ctx.database.display().to_string());
        println!();
        if catalog.shows_empty_state() {
            println!("{}", ui::muted("No courses yet. Add one with `coursebook add`."));
        } else {
            println!("{}", ui::course_table(catalog.items()));
        }
        print_summary(output_mode, &catalog);
    }

    emit_success(
        output_mode,
        "list",
        serde_json::json!({
            "courses": catalog.items(),
            "summary": catalog.summary(),
        }),
    )
}

pub fn run_show(output_mode: OutputMode, ctx: &AppContext, target: &str) -> anyhow::Result<()> {
    let uri = match target.parse::<i64>() {
        Ok(id) => ctx.provider.item_uri(id),
        Err(_) => ctx.provider.parse_uri(target)?,
    };
    let courses = ctx.provider.query(&uri)?;
    if courses.is_empty() && uri.id().is_some() {
        anyhow::bail!("{}", coursebook::Error::CourseNotFound(uri.id().unwrap_or_default()));
    }

    if output_mode.is_human() {
        for course in &courses {
            print_course(ctx, course);
        }
        ui::status(Icons::INFO, "Type", &ctx.provider.mime_type(&uri)?);
    }

    emit_success(
        output_mode,
        "show",
        serde_json::json!({
            "uri": uri.to_uri_string(),
            "type": uri.mime_type(),
            "courses": courses,
        }),
    )
}

fn print_course(ctx: &AppContext, course: &Course) {
    let mut table = TableBuilder::new();
    table.add_row("Name", &course.name);
    table.add_row("Credits", &course.credits.to_string());
    table.add_row("Grade", &course.grade.to_string());
    table.add_row("URI", &ctx.provider.item_uri(course.id).to_uri_string());
    println!("{}", table.build());
}

pub fn run_add(output_mode: OutputMode, ctx: &AppContext, name: &str, credits: &str, grade: &str) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    let mode = catalog.add()?;

    let mut editor = EditorController::new(ctx.provider.clone(), mode);
    editor.set_field(Field::Name, name);
    editor.set_field(Field::Credits, credits);
    editor.set_field(Field::Grade, grade);
    let notice = editor.save();
    catalog.editor_closed()?;

    match notice {
        Some(notice) => {
            finish_with_notice(output_mode, "add", notice)?;
            print_summary(output_mode, &catalog);
            Ok(())
        }
        None => {
            if output_mode.is_human() {
                ui::warn("Nothing to save, every field was blank");
            }
            emit_success(output_mode, "add", serde_json::json!({ "message": "nothing to save", "id": null }))
        }
    }
}

pub fn run_edit(
    output_mode: OutputMode,
    ctx: &AppContext,
    id: i64,
    name: Option<String>,
    credits: Option<String>,
    grade: Option<String>,
) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    let mode = catalog.select(id)?;

    let mut editor = EditorController::new(ctx.provider.clone(), mode);
    editor.activate();
    editor.wait()?;
    if editor.field(Field::Name).is_empty() {
        anyhow::bail!("{}", coursebook::Error::CourseNotFound(id));
    }

    for (field, value) in [(Field::Name, name), (Field::Credits, credits), (Field::Grade, grade)] {
        if let Some(value) = value {
            editor.set_field(field, value);
        }
    }
    if !editor.is_dirty() && output_mode.is_human() {
        println!("{}", ui::dim("No fields given, saving the course unchanged"));
    }

    let notice = editor.save();
    catalog.editor_closed()?;
    if let Some(notice) = notice {
        finish_with_notice(output_mode, "edit", notice)?;
    }
    print_summary(output_mode, &catalog);
    Ok(())
}

pub fn run_delete(output_mode: OutputMode, ctx: &AppContext, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    let mut editor = EditorController::new(ctx.provider.clone(), EditorMode::Edit(id));

    if editor.request_delete() && (yes || confirm("Delete this course?")?) {
        if let Some(notice) = editor.confirm_delete() {
            catalog.editor_closed()?;
            finish_with_notice(output_mode, "delete", notice)?;
            print_summary(output_mode, &catalog);
        }
        return Ok(());
    }

    if editor.request_leave() == Leave::Proceed && output_mode.is_human() {
        println!("{}", ui::dim("Cancelled"));
    }
    emit_success(output_mode, "delete", serde_json::json!({ "message": "cancelled" }))
}

pub fn run_clear(output_mode: OutputMode, ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    catalog.refresh()?;

    let CatalogEffect::ConfirmDeleteAll = catalog.handle_menu(MenuAction::DeleteAllEntries) else {
        return Ok(());
    };
    if !yes && !confirm(&format!("Delete all {} courses?", catalog.items().len()))? {
        if output_mode.is_human() {
            println!("{}", ui::dim("Cancelled"));
        }
        return emit_success(output_mode, "clear", serde_json::json!({ "deleted": 0 }));
    }

    let deleted = catalog.confirm_delete_all()?;
    if output_mode.is_human() {
        ui::success(&format!("{} {} courses deleted", Icons::DEL, deleted));
    }
    emit_success(output_mode, "clear", serde_json::json!({ "deleted": deleted }))
}

pub fn run_summary(output_mode: OutputMode, ctx: &AppContext) -> anyhow::Result<()> {
    let mut catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    catalog.refresh_summary()?;

    if output_mode.is_human() {
        if catalog.summary().is_some() {
            print_summary(output_mode, &catalog);
        } else {
            println!("{}", ui::muted("No courses yet."));
        }
    }
    emit_success(output_mode, "summary", serde_json::json!({ "summary": catalog.summary() }))
}

pub fn run_contact(output_mode: OutputMode, ctx: &AppContext) -> anyhow::Result<()> {
    let catalog = CatalogController::new(ctx.provider.clone(), ctx.contact_url.clone());
    let CatalogEffect::OpenUrl(url) = catalog.handle_menu(MenuAction::ContactDeveloper) else {
        return Ok(());
    };

    if output_mode.is_human() {
        println!("{} {}", Icons::LINK, url.bold());
    }
    emit_success(output_mode, "contact", serde_json::json!({ "url": url }))
}
