#![allow(dead_code)]

use feedback_core::domain::{
    CourseId, OptionBlueprint, QuestionBlueprint, QuestionKind, RollNumber,
};
use feedback_server::db::init_pool_and_migrate;
use feedback_server::repository::{
    CatalogRepository, CourseRecord, DepartmentRecord, NewCourse, NewDepartment, NewSchool,
    NewStudent, NewTeacher, SchoolRecord, SeaOrmCatalogRepository, SeaOrmStudentRepository,
    SeaOrmTeacherRepository, StudentRecord, StudentRepository, TeacherRecord, TeacherRepository,
};
use sea_orm::DatabaseConnection;

/// One school with one department, three courses and two teachers.
pub struct Campus {
    pub db: DatabaseConnection,
    pub school: SchoolRecord,
    pub department: DepartmentRecord,
    pub courses: Vec<CourseRecord>,
    pub teachers: Vec<TeacherRecord>,
}

impl Campus {
    pub fn course_ids(&self, picks: &[usize]) -> Vec<CourseId> {
        picks.iter().map(|i| self.courses[*i].id).collect()
    }

    pub async fn register(&self, roll_number: &str, name: &str, courses: &[usize]) -> StudentRecord {
        SeaOrmStudentRepository::new(self.db.clone())
            .register(NewStudent {
                name: name.to_string(),
                roll_number: RollNumber::new(roll_number).expect("valid roll number"),
                school_id: self.school.id,
                department_id: self.department.id,
                course_ids: self.course_ids(courses),
            })
            .await
            .expect("student should register")
    }
}

pub async fn memory_db() -> DatabaseConnection {
    init_pool_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory database should migrate")
}

pub async fn campus() -> Campus {
    let db = memory_db().await;
    let catalog = SeaOrmCatalogRepository::new(db.clone());
    let teachers = SeaOrmTeacherRepository::new(db.clone());

    let school = catalog
        .create_school(NewSchool {
            name: "School of Engineering".to_string(),
            code: "SOE".to_string(),
            description: String::new(),
        })
        .await
        .expect("school should be created");
    let department = catalog
        .create_department(NewDepartment {
            school_id: school.id,
            name: "Computer Science".to_string(),
            code: "CSE".to_string(),
            description: String::new(),
        })
        .await
        .expect("department should be created");

    let mut courses = Vec::new();
    for (code, name) in [
        ("CS201", "Data Structures"),
        ("CS202", "Operating Systems"),
        ("CS203", "Databases"),
    ] {
        let course = catalog
            .create_course(NewCourse {
                department_id: department.id,
                name: name.to_string(),
                code: code.to_string(),
                semester: 3,
                year: 2025,
                description: String::new(),
            })
            .await
            .expect("course should be created");
        courses.push(course);
    }

    let mut staff = Vec::new();
    for (name, email) in [
        ("Priya Nair", "priya.nair@example.edu"),
        ("Tomas Berg", "tomas.berg@example.edu"),
    ] {
        let teacher = teachers
            .create(NewTeacher {
                name: name.to_string(),
                email: email.to_string(),
                employee_id: None,
                department_id: department.id,
            })
            .await
            .expect("teacher should be created");
        staff.push(teacher);
    }

    Campus {
        db,
        school,
        department,
        courses,
        teachers: staff,
    }
}

pub fn mcq(order: i32, text: &str, options: &[&str], is_required: bool) -> QuestionBlueprint {
    QuestionBlueprint {
        text: text.to_string(),
        kind: QuestionKind::Mcq,
        order,
        is_required,
        options: (1..)
            .zip(options)
            .map(|(order, text)| OptionBlueprint {
                text: text.to_string(),
                order,
            })
            .collect(),
    }
}

pub fn text(order: i32, prompt: &str, is_required: bool) -> QuestionBlueprint {
    QuestionBlueprint {
        text: prompt.to_string(),
        kind: QuestionKind::Text,
        order,
        is_required,
        options: Vec::new(),
    }
}

/// Required rating, required comment, optional suggestion.
pub fn feedback_questions() -> Vec<QuestionBlueprint> {
    vec![
        mcq(1, "Rate the teaching", &["Excellent", "Good", "Poor"], true),
        text(2, "What went well?", true),
        text(3, "Any suggestions?", false),
    ]
}
