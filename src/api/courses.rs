//! Course catalog and enrollment endpoints.

use super::{take_field, ApiClient, ApiError, Method};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub pillars: Vec<String>,
}

/// Body for create and update calls. Unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillars: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Enrollment {
    pub course_id: String,
    #[serde(default)]
    pub enrolled_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseProgress {
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: u32,
    #[serde(default)]
    pub total_lessons: u32,
    #[serde(default)]
    pub percent_complete: f64,
}

fn course_path(id: &str) -> String {
    format!("/api/courses/{}", id)
}

fn draft_body(draft: &CourseDraft) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Every course endpoint, mapped to its method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CourseRoute<'a> {
    List,
    Get(&'a str),
    Create,
    Update(&'a str),
    Delete(&'a str),
    Publish(&'a str),
    Enroll(&'a str),
    Unenroll(&'a str),
    Progress(&'a str),
}

impl CourseRoute<'_> {
    fn request(&self) -> (Method, String) {
        match *self {
            CourseRoute::List => (Method::Get, "/api/courses".to_string()),
            CourseRoute::Get(id) => (Method::Get, course_path(id)),
            CourseRoute::Create => (Method::Post, "/api/courses".to_string()),
            CourseRoute::Update(id) => (Method::Put, course_path(id)),
            CourseRoute::Delete(id) => (Method::Delete, course_path(id)),
            CourseRoute::Publish(id) => (Method::Put, format!("{}/publish", course_path(id))),
            CourseRoute::Enroll(id) => (Method::Post, format!("{}/enroll", course_path(id))),
            CourseRoute::Unenroll(id) => (Method::Delete, format!("{}/enroll", course_path(id))),
            CourseRoute::Progress(id) => (Method::Get, format!("{}/progress", course_path(id))),
        }
    }
}

impl ApiClient {
    fn call_course(
        &self,
        route: CourseRoute,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let (method, path) = route.request();
        self.send(method, &path, body)
    }

    pub fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let envelope = self.call_course(CourseRoute::List, None)?;
        take_field(envelope, "courses")
    }

    pub fn get_course(&self, id: &str) -> Result<Course, ApiError> {
        let envelope = self.call_course(CourseRoute::Get(id), None)?;
        take_field(envelope, "course")
    }

    pub fn create_course(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        let body = draft_body(draft)?;
        let envelope = self.call_course(CourseRoute::Create, Some(&body))?;
        take_field(envelope, "course")
    }

    pub fn update_course(&self, id: &str, draft: &CourseDraft) -> Result<Course, ApiError> {
        let body = draft_body(draft)?;
        let envelope = self.call_course(CourseRoute::Update(id), Some(&body))?;
        take_field(envelope, "course")
    }

    pub fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        self.call_course(CourseRoute::Delete(id), None)?;
        Ok(())
    }

    pub fn publish_course(&self, id: &str) -> Result<Course, ApiError> {
        let envelope = self.call_course(CourseRoute::Publish(id), None)?;
        take_field(envelope, "course")
    }

    pub fn enroll(&self, id: &str) -> Result<Enrollment, ApiError> {
        let envelope = self.call_course(CourseRoute::Enroll(id), None)?;
        take_field(envelope, "enrollment")
    }

    pub fn unenroll(&self, id: &str) -> Result<(), ApiError> {
        self.call_course(CourseRoute::Unenroll(id), None)?;
        Ok(())
    }

    pub fn course_progress(&self, id: &str) -> Result<CourseProgress, ApiError> {
        let envelope = self.call_course(CourseRoute::Progress(id), None)?;
        take_field(envelope, "progress")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draft_skips_unset_fields() {
        let draft = CourseDraft {
            title: Some("Intro to Botany".into()),
            ..Default::default()
        };
        assert_eq!(draft_body(&draft).unwrap(), json!({ "title": "Intro to Botany" }));
    }

    #[test]
    fn test_course_defaults() {
        let courses: Vec<Course> = take_field(
            json!({ "success": true, "courses": [{ "id": "c1", "title": "Botany" }] }),
            "courses",
        )
        .unwrap();
        assert_eq!(courses[0].id, "c1");
        assert!(!courses[0].is_published);
        assert!(courses[0].pillars.is_empty());
    }

    #[test]
    fn test_progress_decoding() {
        let progress: CourseProgress = take_field(
            json!({ "progress": { "course_id": "c1", "completed_lessons": 3, "total_lessons": 12, "percent_complete": 25.0 } }),
            "progress",
        )
        .unwrap();
        assert_eq!(progress.completed_lessons, 3);
        assert_eq!(progress.percent_complete, 25.0);
    }

    #[test]
    fn test_course_path() {
        assert_eq!(course_path("abc"), "/api/courses/abc");
    }

    #[test]
    fn test_course_routes() {
        let table = [
            (CourseRoute::List, "GET", "/api/courses"),
            (CourseRoute::Get("c1"), "GET", "/api/courses/c1"),
            (CourseRoute::Create, "POST", "/api/courses"),
            (CourseRoute::Update("c1"), "PUT", "/api/courses/c1"),
            (CourseRoute::Delete("c1"), "DELETE", "/api/courses/c1"),
            (CourseRoute::Publish("c1"), "PUT", "/api/courses/c1/publish"),
            (CourseRoute::Enroll("c1"), "POST", "/api/courses/c1/enroll"),
            (CourseRoute::Unenroll("c1"), "DELETE", "/api/courses/c1/enroll"),
            (CourseRoute::Progress("c1"), "GET", "/api/courses/c1/progress"),
        ];
        for (route, method, path) in table {
            let (m, p) = route.request();
            assert_eq!((m.as_str(), p.as_str()), (method, path), "{:?}", route);
        }
    }
}
