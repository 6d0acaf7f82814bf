use crate::error::{SchedResult, SchedulerError};
use crate::slots::{self, HOURS_PER_PAIR};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

pub type SemesterId = u64;
pub type GroupId = u64;
pub type SubjectId = u64;
pub type TeacherId = u64;
pub type ClassroomId = u64;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn from_chrono(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from_chrono(date.weekday())
    }

    pub fn is_working_day(&self) -> bool {
        !matches!(self, Self::Saturday | Self::Sunday)
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LessonType {
    Lecture,
    Practice,
    Lab,
    Seminar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PreferenceKind {
    Neutral,
    PreferredFree,
    PreferredBusy,
    RequiredFree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: SemesterId,
    #[serde(default)]
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Semester {
    /// Whole weeks spanned by the semester, rounded up and never below one.
    pub fn weeks(&self) -> u32 {
        let days = u64::try_from((self.end_date - self.start_date).num_days()).unwrap_or(0);
        u32::try_from(days.div_ceil(7)).unwrap_or(u32::MAX).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGroup {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    pub students_count: u32,
    #[serde(default)]
    pub course_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub max_hours_per_week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    #[serde(default)]
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingAssignment {
    pub teacher_id: TeacherId,
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub speciality_code: String,
    #[serde(default)]
    pub course_number: u32,
    #[serde(default)]
    pub lecture_hours: u32,
    #[serde(default)]
    pub practice_hours: u32,
    #[serde(default)]
    pub lab_hours: u32,
    #[serde(default)]
    pub seminar_hours: u32,
}

impl TeachingAssignment {
    /// Required hours per semester for one lesson type.
    pub fn hours_for(&self, lesson_type: LessonType) -> u32 {
        match lesson_type {
            LessonType::Lecture => self.lecture_hours,
            LessonType::Practice => self.practice_hours,
            LessonType::Lab => self.lab_hours,
            LessonType::Seminar => self.seminar_hours,
        }
    }

    /// Lesson types with a positive hour requirement, in declaration order.
    pub fn lesson_types(&self) -> impl Iterator<Item = LessonType> + '_ {
        [
            LessonType::Lecture,
            LessonType::Practice,
            LessonType::Lab,
            LessonType::Seminar,
        ]
        .into_iter()
        .filter(move |&lt| self.hours_for(lt) > 0)
    }

    /// Weekly pair occurrences needed to cover `lesson_type` over `weeks`.
    pub fn pairs_per_week(&self, lesson_type: LessonType, weeks: u32) -> u32 {
        let total_pairs = self.hours_for(lesson_type).div_ceil(HOURS_PER_PAIR);
        (total_pairs / weeks.max(1)).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPreference {
    pub teacher_id: TeacherId,
    pub day_of_week: DayOfWeek,
    pub time_slot_index: usize,
    pub preference: PreferenceKind,
}

/// Raw input as supplied by the persistence layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub semesters: Vec<Semester>,
    pub student_groups: Vec<StudentGroup>,
    pub subjects: Vec<Subject>,
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    pub teaching_assignments: Vec<TeachingAssignment>,
    pub teacher_preferences: Vec<TeacherPreference>,
}

impl Snapshot {
    pub fn from_reader<R: Read>(reader: R) -> SchedResult<Self> {
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SchedResult<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> SchedResult<()> {
        for s in &self.semesters {
            if s.end_date < s.start_date {
                return Err(SchedulerError::Validation(format!(
                    "Semester {} ends ({}) before it starts ({})",
                    s.id, s.end_date, s.start_date
                )));
            }
        }
        for p in &self.teacher_preferences {
            if p.time_slot_index >= slots::FINE_SLOT_COUNT {
                return Err(SchedulerError::Validation(format!(
                    "Preference of teacher {} references time slot {} (max {})",
                    p.teacher_id,
                    p.time_slot_index,
                    slots::FINE_SLOT_COUNT - 1
                )));
            }
        }
        Ok(())
    }
}

/// Read-only, indexed view over a [`Snapshot`].
///
/// All lookups the checker and scorer perform per event are O(1).
#[derive(Debug, Clone)]
pub struct DataService {
    snapshot: Snapshot,
    group_index: HashMap<GroupId, usize>,
    teacher_index: HashMap<TeacherId, usize>,
    subject_index: HashMap<SubjectId, usize>,
    classroom_index: HashMap<ClassroomId, usize>,
    /// Classroom positions sorted by ascending capacity.
    rooms_by_capacity: Vec<usize>,
    required_free: HashSet<(TeacherId, DayOfWeek, usize)>,
    qualified: HashSet<(TeacherId, GroupId, SubjectId, LessonType)>,
}

impl From<Snapshot> for DataService {
    fn from(snapshot: Snapshot) -> Self {
        fn index<T, K: std::hash::Hash + Eq>(items: &[T], key: impl Fn(&T) -> K) -> HashMap<K, usize> {
            items.iter().enumerate().map(|(i, it)| (key(it), i)).collect()
        }

        let group_index = index(&snapshot.student_groups, |g| g.id);
        let teacher_index = index(&snapshot.teachers, |t| t.id);
        let subject_index = index(&snapshot.subjects, |s| s.id);
        let classroom_index = index(&snapshot.classrooms, |c| c.id);

        let mut rooms_by_capacity: Vec<usize> = (0..snapshot.classrooms.len()).collect();
        rooms_by_capacity.sort_by_key(|&i| (snapshot.classrooms[i].capacity, snapshot.classrooms[i].id));

        let required_free = snapshot
            .teacher_preferences
            .iter()
            .filter(|p| p.preference == PreferenceKind::RequiredFree)
            .filter_map(|p| {
                slots::slot_to_pair(p.time_slot_index).map(|pair| (p.teacher_id, p.day_of_week, pair))
            })
            .collect();

        let qualified = snapshot
            .teaching_assignments
            .iter()
            .flat_map(|ta| {
                ta.lesson_types()
                    .map(move |lt| (ta.teacher_id, ta.group_id, ta.subject_id, lt))
            })
            .collect();

        Self {
            snapshot,
            group_index,
            teacher_index,
            subject_index,
            classroom_index,
            rooms_by_capacity,
            required_free,
            qualified,
        }
    }
}

impl DataService {
    pub fn semesters(&self) -> &[Semester] {
        &self.snapshot.semesters
    }

    pub fn groups(&self) -> &[StudentGroup] {
        &self.snapshot.student_groups
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.snapshot.teachers
    }

    pub fn classrooms(&self) -> &[Classroom] {
        &self.snapshot.classrooms
    }

    pub fn assignments(&self) -> &[TeachingAssignment] {
        &self.snapshot.teaching_assignments
    }

    pub fn preferences(&self) -> &[TeacherPreference] {
        &self.snapshot.teacher_preferences
    }

    pub fn semester(&self, id: SemesterId) -> Option<&Semester> {
        self.snapshot.semesters.iter().find(|s| s.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&StudentGroup> {
        self.group_index.get(&id).map(|&i| &self.snapshot.student_groups[i])
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teacher_index.get(&id).map(|&i| &self.snapshot.teachers[i])
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subject_index.get(&id).map(|&i| &self.snapshot.subjects[i])
    }

    pub fn classroom(&self, id: ClassroomId) -> Option<&Classroom> {
        self.classroom_index.get(&id).map(|&i| &self.snapshot.classrooms[i])
    }

    /// Classrooms sorted by ascending capacity.
    pub fn classrooms_by_capacity(&self) -> impl Iterator<Item = &Classroom> + '_ {
        self.rooms_by_capacity.iter().map(|&i| &self.snapshot.classrooms[i])
    }

    /// Classrooms large enough for `students`, smallest first.
    pub fn rooms_fitting(&self, students: u32) -> impl Iterator<Item = &Classroom> + '_ {
        self.classrooms_by_capacity().filter(move |c| c.capacity >= students)
    }

    pub fn smallest_room_fitting(&self, students: u32) -> Option<&Classroom> {
        self.rooms_fitting(students).next()
    }

    pub fn is_required_free(&self, teacher: TeacherId, day: DayOfWeek, pair: usize) -> bool {
        self.required_free.contains(&(teacher, day, pair))
    }

    pub fn is_qualified(
        &self,
        teacher: TeacherId,
        group: GroupId,
        subject: SubjectId,
        lesson_type: LessonType,
    ) -> bool {
        self.qualified.contains(&(teacher, group, subject, lesson_type))
    }

    /// Display title for a lesson: the subject name, or a placeholder.
    pub fn lesson_title(&self, subject: SubjectId) -> String {
        self.subject(subject)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("Subject {}", subject))
    }

    /// Groups whose head-count exceeds every classroom's capacity.
    pub fn oversized_groups(&self) -> Vec<GroupId> {
        let max_capacity = self.classrooms().iter().map(|c| c.capacity).max();
        self.groups()
            .iter()
            .filter(|g| max_capacity.map_or(true, |cap| g.students_count > cap))
            .map(|g| g.id)
            .collect()
    }
}
