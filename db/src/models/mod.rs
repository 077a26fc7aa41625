pub mod cohort;
pub mod cohort_participant;
pub mod course;
pub mod event;
pub mod event_attendee;
pub mod event_file;
pub mod event_note;
pub mod event_type;
pub mod faculty_coordinator;
pub mod high_school;
pub mod report_run;
pub mod setting;
pub mod teacher;
pub mod teacher_course_certificate;
pub mod teacher_high_school;
pub mod term;
pub mod user;

pub use cohort::Entity as Cohort;
pub use cohort_participant::Entity as CohortParticipant;
pub use course::Entity as Course;
pub use event::Entity as Event;
pub use event_attendee::Entity as EventAttendee;
pub use event_file::Entity as EventFile;
pub use event_note::Entity as EventNote;
pub use event_type::Entity as EventType;
pub use faculty_coordinator::Entity as FacultyCoordinator;
pub use high_school::Entity as HighSchool;
pub use report_run::Entity as ReportRun;
pub use setting::Entity as Setting;
pub use teacher::Entity as Teacher;
pub use teacher_course_certificate::Entity as TeacherCourseCertificate;
pub use teacher_high_school::Entity as TeacherHighSchool;
pub use term::Entity as Term;
pub use user::Entity as User;
