// Case database type codes and fixed queries

/// tsk_objects.type
pub(crate) const OBJECT_TYPE_IMAGE: i32 = 0;
pub(crate) const OBJECT_TYPE_ABSTRACT_FILE: i32 = 4;

/// tsk_files.type
pub(crate) const FILE_TYPE_LOCAL: i32 = 3;
pub(crate) const FILE_TYPE_VIRTUAL_DIR: i32 = 6;
pub(crate) const FILE_TYPE_LOCAL_DIR: i32 = 8;

/// tsk_files.meta_type
pub(crate) const META_TYPE_REG: i32 = 1;
pub(crate) const META_TYPE_DIR: i32 = 2;
pub(crate) const META_TYPE_VIRT_DIR: i32 = 11;

/// tsk_files.dir_type
pub(crate) const DIR_TYPE_DIR: i32 = 3;
pub(crate) const DIR_TYPE_REG: i32 = 5;
pub(crate) const DIR_TYPE_VIRT_DIR: i32 = 11;

/// Prefix of default logical file set names
pub(crate) const LOGICAL_FILE_SET_PREFIX: &str = "LogicalFileSet";

pub(crate) const SELECT_DATA_SOURCES_LOGICAL: &str = "SELECT obj_id, name FROM tsk_files \
     WHERE obj_id IN (SELECT obj_id FROM tsk_objects \
     WHERE obj_id IN (SELECT obj_id FROM data_source_info))";

// Ordered so the first segment of a multi-segment image comes first.
pub(crate) const SELECT_DATA_SOURCES_IMAGE: &str = "SELECT obj_id, name FROM tsk_image_names \
     WHERE obj_id IN (SELECT obj_id FROM tsk_objects \
     WHERE obj_id IN (SELECT obj_id FROM data_source_info)) \
     ORDER BY obj_id, sequence";
