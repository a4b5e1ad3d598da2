/// The four screens and the paths that reach them. `/` is an alias for the
/// registrations screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CourseTypes,
    Courses,
    CourseOfferings,
    Registrations,
}

impl Route {
    /// Tab order in the navigation bar.
    pub const ALL: [Route; 4] = [
        Route::CourseTypes,
        Route::Courses,
        Route::CourseOfferings,
        Route::Registrations,
    ];

    /// Resolve a path. Unknown paths land on the root screen.
    pub fn from_path(path: &str) -> Self {
        match path.trim().trim_end_matches('/') {
            "/course-types" => Route::CourseTypes,
            "/courses" => Route::Courses,
            "/course-offerings" => Route::CourseOfferings,
            _ => Route::Registrations,
        }
    }

    /// Canonical path for this screen, as accepted by `--route`.
    pub fn path(self) -> &'static str {
        match self {
            Route::CourseTypes => "/course-types",
            Route::Courses => "/courses",
            Route::CourseOfferings => "/course-offerings",
            Route::Registrations => "/registrations",
        }
    }

    /// Heading shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Route::CourseTypes => "Course Types",
            Route::Courses => "Courses",
            Route::CourseOfferings => "Course Offerings",
            Route::Registrations => "Registrations",
        }
    }

    /// Position in [`Route::ALL`], used to highlight the active tab.
    pub fn index(self) -> usize {
        match self {
            Route::CourseTypes => 0,
            Route::Courses => 1,
            Route::CourseOfferings => 2,
            Route::Registrations => 3,
        }
    }

    /// Route bound to the `1`-`4` / F1-F4 shortcuts.
    pub fn from_shortcut(n: u8) -> Option<Self> {
        Route::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }
}
