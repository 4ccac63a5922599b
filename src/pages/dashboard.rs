use std::fmt::Write;

use strum::IntoEnumIterator;

use super::{escape, layout};
use crate::controller::{
    CurrentUser, GoalCard, ManagerContent, ManagerDashboard, MenuChoice, Navigation,
    PerformanceReport, View,
};
use crate::model::GoalStatus;

pub fn dashboard_page(user: &CurrentUser, view: &View) -> String {
    let mut sidebar = format!(
        "<h2>Welcome, {}!</h2><p><strong>Role:</strong> {}</p>\
         <form method=\"post\" action=\"/logout\"><button type=\"submit\">Logout</button></form>",
        escape(&user.name),
        user.role.label()
    );

    let body = match view {
        View::NoReports => {
            "<h1>Manager Dashboard</h1><div class=\"warning\">You have no employees assigned to you.</div>"
                .to_string()
        }
        View::Manager(dashboard) => {
            sidebar.push_str(&manager_sidebar(dashboard));
            manager_body(dashboard)
        }
        View::Employee(cards) => employee_body(cards),
    };

    layout("Performance Management System", Some(&sidebar), &body)
}

fn manager_sidebar(dashboard: &ManagerDashboard) -> String {
    let mut html = String::from(
        "<hr><form method=\"get\" action=\"/dashboard\"><label>Select Employee <select name=\"employee\">",
    );
    for report in &dashboard.reports {
        let selected = if report.employee_id == dashboard.selected.employee_id {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            html,
            "<option value=\"{}\"{selected}>{}</option>",
            report.employee_id,
            escape(&report.name)
        );
    }
    let _ = write!(
        html,
        "</select></label><input type=\"hidden\" name=\"view\" value=\"{}\">\
         <button type=\"submit\">Show</button></form><hr><nav><h3>Menu</h3><ul>",
        dashboard.menu
    );
    for menu in MenuChoice::iter() {
        let href = Navigation {
            employee: Some(dashboard.selected.employee_id),
            menu,
        }
        .href();
        if menu == dashboard.menu {
            let _ = write!(html, "<li><strong>{}</strong></li>", menu.label());
        } else {
            let _ = write!(html, "<li><a href=\"{}\">{}</a></li>", escape(&href), menu.label());
        }
    }
    html.push_str("</ul></nav>");
    html
}

fn manager_body(dashboard: &ManagerDashboard) -> String {
    let employee_id = dashboard.selected.employee_id;
    let name = escape(&dashboard.selected.name);
    let mut html = format!("<h1>Manager Dashboard</h1><h2>Managing: {name}</h2>");

    match &dashboard.content {
        ManagerContent::Performance(cards) if cards.is_empty() => {
            let _ = write!(
                html,
                "<div class=\"info\">{name} has no goals assigned yet.</div>"
            );
        }
        ManagerContent::Performance(cards) => {
            for card in cards {
                html.push_str(&manager_goal_card(card, employee_id));
            }
        }
        ManagerContent::NewGoal => {
            let _ = write!(
                html,
                r#"<form method="post" action="/goals" class="card">
<h3>Add a New Goal for {name}</h3>
<input type="hidden" name="employee" value="{employee_id}">
<p><label>Goal Title <input type="text" name="title" required></label></p>
<p><label>Description <textarea name="description"></textarea></label></p>
<p><label>Due Date <input type="date" name="due_date" required></label></p>
<p><button type="submit">Add Goal</button></p>
</form>"#
            );
        }
        ManagerContent::Report(report) => html.push_str(&report_table(report, &name)),
    }

    html
}

fn goal_header(html: &mut String, card: &GoalCard) {
    let goal = &card.goal;
    let _ = write!(
        html,
        "<h3>Goal: {} (Due: {}) | Status: {}</h3>",
        escape(&goal.title),
        goal.due_date,
        goal.status
    );
    if let Some(description) = &goal.description {
        let _ = write!(html, "<p><strong>Description:</strong> {}</p>", escape(description));
    }
}

fn feedback_list(html: &mut String, card: &GoalCard) {
    for entry in &card.feedback {
        let _ = write!(
            html,
            "<div class=\"info\"><strong>{}</strong> ({}): {}</div>",
            escape(&entry.manager_name),
            entry.created_at.format("%Y-%m-%d %H:%M"),
            escape(&entry.feedback_text)
        );
    }
}

fn manager_goal_card(card: &GoalCard, employee_id: i64) -> String {
    let goal_id = card.goal.goal_id;
    let mut html = String::from("<section class=\"card\">");
    goal_header(&mut html, card);

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/goals/{goal_id}/status\">\
         <input type=\"hidden\" name=\"employee\" value=\"{employee_id}\">\
         <label>Update Status <select name=\"status\">"
    );
    for status in GoalStatus::iter() {
        let selected = if status == card.goal.status { " selected" } else { "" };
        let _ = write!(html, "<option{selected}>{status}</option>");
    }
    html.push_str("</select></label> <button type=\"submit\">Save Status</button></form>");

    html.push_str("<h4>Tasks Logged by Employee</h4>");
    if card.tasks.is_empty() {
        html.push_str("<p>No tasks logged for this goal yet.</p>");
    } else {
        html.push_str("<ul>");
        for task in &card.tasks {
            let _ = write!(
                html,
                "<li>{} (Status: <strong>{}</strong>)",
                escape(&task.description),
                task.status
            );
            if task.is_reviewable() {
                for (action, label) in [("approve", "Approve"), ("reject", "Reject")] {
                    let _ = write!(
                        html,
                        " <form class=\"inline\" method=\"post\" action=\"/tasks/{}/{action}\">\
                         <input type=\"hidden\" name=\"employee\" value=\"{employee_id}\">\
                         <button type=\"submit\">{label}</button></form>",
                        task.task_id
                    );
                }
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
    }

    let _ = write!(
        html,
        "<h4>Provide &amp; View Feedback</h4>\
         <form method=\"post\" action=\"/goals/{goal_id}/feedback\">\
         <input type=\"hidden\" name=\"employee\" value=\"{employee_id}\">\
         <p><label>Your Feedback <textarea name=\"feedback_text\"></textarea></label></p>\
         <p><button type=\"submit\">Submit Feedback</button></p></form>"
    );
    feedback_list(&mut html, card);

    html.push_str("</section>");
    html
}

fn report_table(report: &PerformanceReport, name: &str) -> String {
    let mut html = format!("<h3>Performance Report for {name}</h3>");
    if report.rows.is_empty() {
        html.push_str("<p>No goals to report on.</p>");
        return html;
    }

    let _ = write!(
        html,
        "<p>Goals: {} &middot; Completed: {} &middot; In Progress: {} &middot; Not Started: {} \
         &middot; On Hold: {} &middot; Completion: {:.0}%</p>",
        report.total_goals(),
        report.completed,
        report.in_progress,
        report.not_started,
        report.on_hold,
        report.completion_rate() * 100.0
    );
    html.push_str(
        "<table><thead><tr><th>Goal</th><th>Due</th><th>Status</th>\
         <th>Pending</th><th>Approved</th><th>Rejected</th><th>Feedback</th></tr></thead><tbody>",
    );
    for row in &report.rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.title),
            row.due_date,
            row.status,
            row.pending,
            row.approved,
            row.rejected,
            row.feedback
        );
    }
    let _ = write!(
        html,
        "</tbody></table><p>Tasks: {} pending, {} approved, {} rejected</p>",
        report.tasks_pending, report.tasks_approved, report.tasks_rejected
    );
    html
}

fn employee_body(cards: &[GoalCard]) -> String {
    let mut html = String::from("<h1>My Goals</h1>");
    if cards.is_empty() {
        html.push_str("<div class=\"info\">You have no goals assigned yet.</div>");
        return html;
    }

    for card in cards {
        html.push_str("<section class=\"card\">");
        goal_header(&mut html, card);

        html.push_str("<h4>My Tasks</h4>");
        if card.tasks.is_empty() {
            html.push_str("<p>No tasks logged for this goal yet.</p>");
        } else {
            html.push_str("<ul>");
            for task in &card.tasks {
                let _ = write!(
                    html,
                    "<li>{} (Status: <strong>{}</strong>)</li>",
                    escape(&task.description),
                    task.status
                );
            }
            html.push_str("</ul>");
        }

        let _ = write!(
            html,
            "<form method=\"post\" action=\"/goals/{}/tasks\">\
             <p><label>Log a Task <input type=\"text\" name=\"description\" required></label>\
             <button type=\"submit\">Log Task</button></p></form>",
            card.goal.goal_id
        );

        html.push_str("<h4>Feedback</h4>");
        feedback_list(&mut html, card);
        html.push_str("</section>");
    }
    html
}
