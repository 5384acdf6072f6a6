//! Fixed source-platform vocabularies. These sets are versioned with the
//! source platform and stay immutable for the lifetime of a run.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Every element tag the parser recognizes as a workflow action.
pub const ACTION_TAGS: &[&str] = &[
    // generic steps
    "step", "Step", "action", "Action",
    // browser
    "openBrowser", "OpenBrowser", "navigate", "Navigate",
    "closeBrowser", "CloseBrowser",
    "click", "Click", "typeInto", "TypeInto",
    "getText", "GetText", "extractData", "ExtractData",
    "waitElement", "WaitElement",
    // conditionals
    "if", "If", "elseIf", "ElseIf", "else", "Else",
    "switch", "Switch", "case", "Case",
    "branch", "Branch",
    // loops
    "forEach", "ForEach", "while", "While",
    "loop", "Loop", "repeat", "Repeat",
    // Excel
    "excelOpen", "ExcelOpen", "excelReadRange", "ExcelReadRange",
    "excelWriteRange", "ExcelWriteRange", "excelWriteCell", "ExcelWriteCell",
    // file system
    "copyFile", "CopyFile", "moveFile", "MoveFile",
    "deleteFile", "DeleteFile", "createDirectory", "CreateDirectory",
    // data / logging
    "assign", "Assign", "log", "Log",
    // error handling
    "tryCatch", "TryCatch", "throw", "Throw",
    // mail
    "sendMail", "SendMail",
    // waits
    "delay", "Delay", "wait", "Wait",
    // sub-workflow invocation
    "executeRobot", "ExecuteRobot", "callRobot", "CallRobot",
    // OCR / image / desktop
    "ocrRead", "OCRRead", "imageRecognition", "ImageRecognition",
    "desktopRecorder", "DesktopRecorder",
];

pub const VARIABLE_TAGS: &[&str] = &["variable", "Variable", "parameter", "Parameter"];

pub const SUB_WORKFLOW_TAGS: &[&str] = &["executeRobot", "ExecuteRobot", "callRobot", "CallRobot"];

/// Action types that open a conditional scope for nesting-depth purposes.
pub const BRANCH_ACTIONS: &[&str] = &[
    "if", "If", "elseIf", "ElseIf", "switch", "Switch", "branch", "Branch", "case", "Case",
];

/// Action types that open a loop scope for nesting-depth purposes.
pub const LOOP_ACTIONS: &[&str] = &[
    "forEach", "ForEach", "while", "While", "loop", "Loop", "repeat", "Repeat",
];

/// Action types flagged as migration risks (screen-dependent automation).
pub const RISK_ACTIONS: &[&str] = &[
    "ocrRead", "OCRRead", "imageRecognition", "ImageRecognition",
    "desktopRecorder", "DesktopRecorder",
];

/// Keywords whose presence in a property value marks an external connection.
pub const CONNECTION_KEYWORDS: &[&str] = &[
    "jdbc", "odbc", "database", "db", "connection", "connectionstring",
    "sqlserver", "oracle", "mysql", "postgresql",
    "ftp", "sftp", "ssh", "smtp", "imap", "pop3",
    "http", "https", "rest", "soap", "wsdl",
];

lazy_static! {
    pub static ref ACTION_TAG_SET: HashSet<&'static str> = ACTION_TAGS.iter().copied().collect();
    pub static ref VARIABLE_TAG_SET: HashSet<&'static str> =
        VARIABLE_TAGS.iter().copied().collect();
    pub static ref SUB_WORKFLOW_TAG_SET: HashSet<&'static str> =
        SUB_WORKFLOW_TAGS.iter().copied().collect();
    pub static ref BRANCH_ACTION_SET: HashSet<&'static str> =
        BRANCH_ACTIONS.iter().copied().collect();
    pub static ref LOOP_ACTION_SET: HashSet<&'static str> = LOOP_ACTIONS.iter().copied().collect();
    pub static ref RISK_ACTION_SET: HashSet<&'static str> = RISK_ACTIONS.iter().copied().collect();

    /// Windows drive paths, Unix paths with an extension, and UNC shares.
    pub static ref FILE_PATH_RE: Regex =
        Regex::new(r#"[A-Za-z]:\\[^\s"<>|*?]+|/[^\s"<>|*?]+\.\w{1,5}|\\\\[^\s"<>|*?]+"#).unwrap();

    /// HTTP(S) and WSDL-style endpoint URLs.
    pub static ref API_URL_RE: Regex = Regex::new(r#"https?://[^\s"<>]+|wsdl://[^\s"<>]+"#).unwrap();
}

pub fn is_action_tag(tag: &str) -> bool {
    ACTION_TAG_SET.contains(tag)
}

pub fn is_variable_tag(tag: &str) -> bool {
    VARIABLE_TAG_SET.contains(tag)
}

pub fn is_sub_workflow_tag(tag: &str) -> bool {
    SUB_WORKFLOW_TAG_SET.contains(tag)
}
