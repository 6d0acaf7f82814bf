#![allow(dead_code)]

use chrono::NaiveDate;
use classforge::domain::*;
use classforge::schedule::WeeklyEvent;

/// Monday 2024-09-02 through Sunday 2024-12-08: exactly 14 full weeks.
pub fn semester_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

pub fn semester_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 8).unwrap()
}

pub const SEMESTER: SemesterId = 1;

/// Builder for small in-memory snapshots.
pub struct Fixture {
    snapshot: Snapshot,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            snapshot: Snapshot {
                semesters: vec![Semester {
                    id: SEMESTER,
                    title: "Fall 2024".into(),
                    start_date: semester_start(),
                    end_date: semester_end(),
                }],
                ..Default::default()
            },
        }
    }

    pub fn group(mut self, id: GroupId, students: u32) -> Self {
        self.snapshot.student_groups.push(StudentGroup {
            id,
            name: format!("G-{}", id),
            students_count: students,
            course_number: 1,
        });
        self
    }

    pub fn room(mut self, id: ClassroomId, capacity: u32) -> Self {
        self.snapshot.classrooms.push(Classroom {
            id,
            name: format!("R-{}", id),
            capacity,
        });
        self
    }

    pub fn teacher(mut self, id: TeacherId, max_hours_per_week: u32) -> Self {
        self.snapshot.teachers.push(Teacher {
            id,
            first_name: format!("T{}", id),
            last_name: "Test".into(),
            max_hours_per_week,
        });
        self
    }

    pub fn subject(mut self, id: SubjectId, name: &str) -> Self {
        self.snapshot.subjects.push(Subject {
            id,
            name: name.into(),
        });
        self
    }

    pub fn lectures(self, teacher: TeacherId, group: GroupId, subject: SubjectId, hours: u32) -> Self {
        self.assignment(teacher, group, subject, LessonType::Lecture, hours)
    }

    pub fn assignment(
        mut self,
        teacher: TeacherId,
        group: GroupId,
        subject: SubjectId,
        lesson_type: LessonType,
        hours: u32,
    ) -> Self {
        let mut ta = TeachingAssignment {
            teacher_id: teacher,
            group_id: group,
            subject_id: subject,
            speciality_code: "122".into(),
            course_number: 1,
            lecture_hours: 0,
            practice_hours: 0,
            lab_hours: 0,
            seminar_hours: 0,
        };
        match lesson_type {
            LessonType::Lecture => ta.lecture_hours = hours,
            LessonType::Practice => ta.practice_hours = hours,
            LessonType::Lab => ta.lab_hours = hours,
            LessonType::Seminar => ta.seminar_hours = hours,
        }
        self.snapshot.teaching_assignments.push(ta);
        self
    }

    pub fn preference(
        mut self,
        teacher: TeacherId,
        day: DayOfWeek,
        slot: usize,
        preference: PreferenceKind,
    ) -> Self {
        self.snapshot.teacher_preferences.push(TeacherPreference {
            teacher_id: teacher,
            day_of_week: day,
            time_slot_index: slot,
            preference,
        });
        self
    }

    pub fn snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn build(self) -> DataService {
        DataService::from(self.snapshot)
    }
}

pub fn lecture(
    teacher: TeacherId,
    group: GroupId,
    room: ClassroomId,
    day: DayOfWeek,
    pair: usize,
) -> WeeklyEvent {
    event(teacher, group, 1, room, LessonType::Lecture, day, pair)
}

pub fn event(
    teacher: TeacherId,
    group: GroupId,
    subject: SubjectId,
    room: ClassroomId,
    lesson_type: LessonType,
    day: DayOfWeek,
    pair: usize,
) -> WeeklyEvent {
    WeeklyEvent {
        title: format!("S{}", subject),
        day_of_week: day,
        pair_index: pair,
        group_id: group,
        teacher_id: teacher,
        subject_id: subject,
        classroom_id: room,
        lesson_type,
    }
}

/// Two teachers and six 30-student groups, each teacher qualified to lecture
/// subject 1 to every group. Rooms 1-6 seat 50, room 99 seats 5.
pub fn campus() -> Fixture {
    let mut f = Fixture::new().subject(1, "Mathematics").teacher(1, 40).teacher(2, 40);
    for g in 1..=6 {
        f = f.group(g, 30).room(g, 50);
        f = f.lectures(1, g, 1, 28).lectures(2, g, 1, 28);
    }
    f.room(99, 5)
}
