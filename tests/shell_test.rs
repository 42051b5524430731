use anyhow::Result;
use course_roster::{MemoryAuditLog, RegistrationService, Shell};
use std::io::Cursor;

fn run_shell(service: &mut RegistrationService<MemoryAuditLog>, script: &str) -> Result<String> {
    let mut output = Vec::new();
    Shell::new(service, Cursor::new(script.as_bytes()), &mut output).run()?;
    Ok(String::from_utf8(output)?)
}

#[test]
fn test_menu_drives_enrollment_flow() -> Result<()> {
    let mut service = RegistrationService::new(MemoryAuditLog::new());
    let script = "\
2
Algorithms
1
2024-01-10
1
Ada
Lovelace
1815-12-10
1
1
Alan
Turing
1912-06-23
2
3
1
Algorithms
3
2
Algorithms
7
0
";

    let output = run_shell(&mut service, script)?;

    assert!(output.contains("✅ Course Algorithms added"));
    assert!(output.contains("✅ Student 1 enrolled in Algorithms"));
    assert!(output.contains("❌ Course 'Algorithms' is full (capacity 1)"));
    assert!(output.contains("No courses with free seats"));
    assert!(output.trim_end().ends_with("Goodbye!"));

    assert_eq!(service.course("Algorithms").unwrap().students(), ["1".to_string()]);
    Ok(())
}

#[test]
fn test_bad_input_does_not_stop_the_loop() -> Result<()> {
    let mut service = RegistrationService::new(MemoryAuditLog::new());
    let script = "\
42
2
Databases
many
2024-02-01
2
Databases
0
2024-02-01
1
Grace
Hopper
not-a-date
G1
7
8
nobody
6
0
";

    let output = run_shell(&mut service, script)?;

    assert!(output.contains("❌ Unknown option '42'"));
    assert!(output.contains("'many' is not a valid capacity"));
    assert!(output.contains("capacity must be at least 1"));
    assert!(output.contains("'not-a-date' is not a valid date"));
    assert!(output.contains("❌ Student 'nobody' not found"));
    assert!(output.contains("No courses with free seats"));
    assert!(output.contains("No courses registered"));
    assert!(service.list_courses().is_empty());
    assert!(service.list_students().is_empty());

    // 只有服務層操作會寫入稽核紀錄
    assert_eq!(service.audit().entries().len(), 1);
    Ok(())
}

#[test]
fn test_listing_and_removal_through_menu() -> Result<()> {
    let mut service = RegistrationService::new(MemoryAuditLog::new());
    let script = "\
1
Zoe
Smith
2000-01-01
Z
1
Adam
Smith
2000-02-02
A
2
Compilers
5
2024-09-01
3
Z
Compilers
10
Compilers
9
Compilers
4
Z
Compilers
9
Compilers
8
Z
5
";

    let output = run_shell(&mut service, script)?;

    assert!(output.contains("- Zoe Smith (ID: Z, born 2000-01-01)"));
    assert!(output.contains("❌ Course Compilers still has 1 enrollment(s)"));
    assert!(output.contains("✅ Student Z withdrawn from Compilers"));
    assert!(output.contains("✅ Removed Compilers"));
    assert!(output.contains("✅ Removed Zoe Smith"));

    // 最後的列表只剩 Adam；輸入結束視同離開
    let last_listing = output.rsplit("Select an option").nth(1).unwrap_or_default();
    assert!(last_listing.contains("Adam Smith"));
    assert!(!last_listing.contains("Zoe Smith"));
    assert!(output.trim_end().ends_with("Goodbye!"));
    Ok(())
}

#[test]
fn test_eof_mid_prompt_exits_cleanly() -> Result<()> {
    let mut service = RegistrationService::new(MemoryAuditLog::new());
    let output = run_shell(&mut service, "1\nAda\n")?;

    assert!(output.contains("Last name: "));
    assert!(output.trim_end().ends_with("Goodbye!"));
    assert!(service.list_students().is_empty());
    Ok(())
}
