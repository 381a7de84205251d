use qoelog_testing::{AddendumBuilder, PacketBuilder, TestWorld, group_line, log_text};

pub const FIRST: &str = "01-Jan-2022 10:00:00";
pub const SECOND: &str = "02-Jan-2022 10:00:00";
pub const THIRD: &str = "03-Jan-2022 10:00:00";

/// Three runs in one log, an addendum and a group file
pub fn measurement_world() -> TestWorld {
    TestWorld::new()
        .with_log(
            "session.log",
            &log_text(&[
                PacketBuilder::new("Test", FIRST)
                    .field("MOS", "4.5")
                    .git_hash("aaa")
                    .arguments("'trials',100,'audio','a.wav'"),
                PacketBuilder::new("Test", SECOND)
                    .field("MOS", "3.1")
                    .git_hash("bbb")
                    .arguments("'trials',50,'audio','b.wav'")
                    .error_note("radio dropped"),
                PacketBuilder::new("Access", THIRD)
                    .field("MOS", "2.0")
                    .git_hash("ccc"),
            ]),
        )
        .with_log(
            "session.ad-log",
            &AddendumBuilder::new("Access", THIRD).set("MOS", "2.2").build(),
        )
        .with_log("runs.gr-log", &group_line(&["runA"], &[FIRST, THIRD]))
        .with_data_file("data/csv/capture_Test_01-Jan-2022_10-00-00.csv")
        .with_data_file("data/csv/capture_Access_03-Jan-2022_10-00-00.csv")
}

/// `qoelog` command wired to the world's config and working directory
#[allow(deprecated)]
pub fn qoelog(world: &TestWorld) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("qoelog").expect("qoelog binary is built");
    world.configure_command(&mut cmd);
    cmd
}
