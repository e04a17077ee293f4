use std::path::PathBuf;

/// Host operating system, selects the wrapper script flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Unix,
    Windows,
}

impl HostOs {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Unix
        }
    }
}

/// Project and toolchain metadata consumed by the checker
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory the build is launched from
    pub base_dir: Option<PathBuf>,
    /// Root of the course tree
    pub course_dir: PathBuf,
    /// JDK used by the build
    pub toolchain_home: Option<PathBuf>,
    pub host_os: HostOs,
}

impl Project {
    /// Project whose base directory is also the course root
    pub fn new(course_dir: impl Into<PathBuf>, toolchain_home: Option<PathBuf>) -> Self {
        let course_dir = course_dir.into();
        Self {
            base_dir: Some(course_dir.clone()),
            course_dir,
            toolchain_home,
            host_os: HostOs::current(),
        }
    }
}
