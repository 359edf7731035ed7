//! Interactive main menu.
//!
//! The loop itself is a two-state machine: [`MenuState::MainMenu`] until
//! the user picks Exit (or input runs out), then [`MenuState::Terminated`].
//! Each selection runs one action and comes back to the menu. Store, scan
//! and report failures are printed and the session carries on; only a
//! broken console ends it early.

use crate::cli::terminal::Terminal;
use crate::error::CliResult;
use crate::output::{render, render_table, save_report, ReportFormat};
use crate::scanner::{run_scan, PortScanService, ScanEvent};
use crate::storage::{AddressRepository, Listing, RemoveOutcome};
use crate::types::{PortSpec, TargetAddress};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const MENU_TITLE: &str = "Main Menu";
const FAREWELL: &str = "Thank you for using scout. Bye!";

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Terminated,
}

/// A numbered menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Scan,
    Add,
    Delete,
    View,
    Clear,
    Exit,
}

impl MenuChoice {
    /// Entries in display order; entry `n` is numbered `n + 1`.
    pub const ALL: [MenuChoice; 6] = [
        Self::Scan,
        Self::Add,
        Self::Delete,
        Self::View,
        Self::Clear,
        Self::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Scan => "Scan IP-address",
            Self::Add => "Add IP-address to scan list",
            Self::Delete => "Delete IP-address from scan list",
            Self::View => "View scan list",
            Self::Clear => "Clear scan list",
            Self::Exit => "Exit",
        }
    }

    /// Parse a menu number such as `"3"`.
    pub fn parse(input: &str) -> Option<Self> {
        let index: usize = input.trim().parse().ok()?;
        Self::ALL.get(index.checked_sub(1)?).copied()
    }
}

/// Next state after a selection. `None` is unrecognised input.
pub fn transition(state: MenuState, choice: Option<MenuChoice>) -> MenuState {
    match (state, choice) {
        (MenuState::MainMenu, Some(MenuChoice::Exit)) => MenuState::Terminated,
        (MenuState::MainMenu, _) => MenuState::MainMenu,
        (MenuState::Terminated, _) => MenuState::Terminated,
    }
}

/// The interactive session.
pub struct Menu<'a, R, W> {
    terminal: Terminal<R, W>,
    store: &'a dyn AddressRepository,
    service: &'a dyn PortScanService,
    ports: PortSpec,
    report_format: ReportFormat,
    show_progress: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        terminal: Terminal<R, W>,
        store: &'a dyn AddressRepository,
        service: &'a dyn PortScanService,
        ports: PortSpec,
    ) -> Self {
        Self {
            terminal,
            store,
            service,
            ports,
            report_format: ReportFormat::default(),
            show_progress: false,
        }
    }

    /// Format used for saved reports.
    pub fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }

    /// Show a spinner while each host is scanned.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Give back the console.
    pub fn into_terminal(self) -> Terminal<R, W> {
        self.terminal
    }

    /// Run until Exit or end of input.
    pub async fn run(&mut self) -> CliResult<()> {
        let mut state = MenuState::MainMenu;

        while state == MenuState::MainMenu {
            self.print_menu()?;

            let choice = match self.terminal.read_line("> ")? {
                None => Some(MenuChoice::Exit),
                Some(input) => {
                    let choice = MenuChoice::parse(&input);
                    if choice.is_none() {
                        self.terminal
                            .warn(format!("Invalid selection '{}', choose 1-6.", input))?;
                    }
                    choice
                }
            };

            debug!(?choice, "menu selection");
            if let Some(choice) = choice {
                self.dispatch(choice).await?;
            }
            state = transition(state, choice);
        }

        self.terminal.println(FAREWELL)?;
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.terminal.println(MENU_TITLE)?;
        self.terminal.println("=".repeat(MENU_TITLE.len()))?;
        for (index, choice) in MenuChoice::ALL.iter().enumerate() {
            self.terminal.println(format!("{}. {}", index + 1, choice.label()))?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::Scan => self.scan().await,
            MenuChoice::Add => self.add(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::View => self.view(),
            MenuChoice::Clear => self.clear(),
            MenuChoice::Exit => Ok(()),
        }
    }

    async fn scan(&mut self) -> io::Result<()> {
        let addresses = match self.store.list() {
            Ok(Listing::Absent) => {
                return self.terminal.warn(format!(
                    "The file {} does not exist, add IP addresses first.",
                    self.store.location()
                ));
            }
            Ok(Listing::Entries(entries)) if entries.is_empty() => {
                return self
                    .terminal
                    .info("The list of IP addresses is empty, nothing to scan.");
            }
            Ok(Listing::Entries(entries)) => entries,
            Err(e) => return self.terminal.error(e),
        };

        let terminal = &mut self.terminal;
        let show_progress = self.show_progress;
        let mut spinner: Option<ProgressBar> = None;
        let mut write_error: Option<io::Error> = None;

        let outcome = run_scan(self.service, &addresses, &self.ports, |event| {
            if !matches!(event, ScanEvent::Started(_)) {
                if let Some(pb) = spinner.take() {
                    pb.finish_and_clear();
                }
            }

            let written = match event {
                ScanEvent::Skipped(entry) => {
                    terminal.warn(format!("Skipping invalid IP address: {}", entry))
                }
                ScanEvent::Started(target) => {
                    spinner = Some(start_spinner(show_progress, target));
                    terminal.println(format!("Scanning {}...", target))
                }
                ScanEvent::HostDown(target) => {
                    terminal.warn(format!("Host {} is down or unresponsive.", target))
                }
                ScanEvent::Completed { target, findings } => {
                    terminal.println(format!("Host {} is up, {} port(s) reported.", target, findings))
                }
                ScanEvent::Failed { target, error } => {
                    terminal.error(format!("Scan of {} failed: {}", target, error))
                }
            };

            if let Err(e) = written {
                write_error.get_or_insert(e);
            }
        })
        .await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        if let Some(e) = write_error {
            return Err(e);
        }

        let table = render_table(&outcome.findings);
        self.terminal.println(&table)?;
        self.terminal.info(outcome.summary())?;

        if !self
            .terminal
            .confirm("Do you want to save the scan results to a file? (y/n): ")?
        {
            return Ok(());
        }

        let Some(file_name) = self.terminal.read_line(
            "Enter the name of the file to save the scan results (e.g., scan_results.txt): ",
        )?
        else {
            return Ok(());
        };
        if file_name.is_empty() {
            return self.terminal.warn("No file name given, results not saved.");
        }

        let block = match self.report_format {
            ReportFormat::Table => Ok(table),
            format => render(&outcome.findings, format),
        };

        match block.and_then(|block| save_report(&block, Path::new(&file_name))) {
            Ok(()) => self
                .terminal
                .success(format!("Scan results have been saved to {}", file_name)),
            Err(e) => self.terminal.error(e),
        }
    }

    fn add(&mut self) -> io::Result<()> {
        let Some(input) = self
            .terminal
            .read_line("Enter an IP address to add to the list: ")?
        else {
            return Ok(());
        };

        match self.store.append(&input) {
            Ok(target) => self.terminal.success(format!(
                "{} has been added to {}",
                target,
                self.store.location()
            )),
            Err(e) => self.terminal.error(e),
        }
    }

    fn delete(&mut self) -> io::Result<()> {
        let Some(input) = self
            .terminal
            .read_line("Enter the IP address you wish to delete: ")?
        else {
            return Ok(());
        };

        match self.store.remove(&input) {
            Ok(RemoveOutcome::Removed) => self
                .terminal
                .success(format!("The IP address {} was removed from the list.", input)),
            Ok(RemoveOutcome::NotPresent) => self.terminal.info(format!(
                "The IP address {} is not in the list, nothing removed.",
                input
            )),
            Ok(RemoveOutcome::StoreAbsent) => self.terminal.warn(format!(
                "The file {} does not exist, nothing to remove.",
                self.store.location()
            )),
            Err(e) => self.terminal.error(e),
        }
    }

    fn view(&mut self) -> io::Result<()> {
        match self.store.list() {
            Ok(Listing::Absent) => self.terminal.warn(format!(
                "The file {} does not exist, add IP addresses first.",
                self.store.location()
            )),
            Ok(Listing::Entries(entries)) if entries.is_empty() => {
                self.terminal.info("The list of IP addresses is empty.")
            }
            Ok(Listing::Entries(entries)) => {
                self.terminal.println("IP addresses currently in the list:")?;
                for entry in entries {
                    self.terminal.println(entry)?;
                }
                Ok(())
            }
            Err(e) => self.terminal.error(e),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        if !self
            .terminal
            .confirm("Are you sure you want to clear the list of IP addresses? (y/n): ")?
        {
            return self.terminal.info("List will not be cleared.");
        }

        match self.store.clear() {
            Ok(()) => self.terminal.success("IP address file cleared."),
            Err(e) => self.terminal.error(e),
        }
    }
}

fn start_spinner(enabled: bool, target: &TargetAddress) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("scanning {}", target));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::fake::{tcp, FakeService};
    use crate::scanner::{HostScan, PortState};
    use crate::storage::TextFileStore;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn test_store() -> (TextFileStore, TempDir) {
        let dir = tempdir().unwrap();
        let store = TextFileStore::new(dir.path().join("ip_addresses.txt"));
        (store, dir)
    }

    async fn run_session(
        store: &TextFileStore,
        service: &FakeService,
        input: &str,
    ) -> String {
        let terminal = Terminal::new(input.as_bytes(), Vec::new());
        let mut menu = Menu::new(terminal, store, service, PortSpec::default());
        menu.run().await.unwrap();
        String::from_utf8(menu.into_terminal().into_inner().1).unwrap()
    }

    #[test]
    fn test_transition() {
        use MenuChoice::*;
        use MenuState::*;

        assert_eq!(transition(MainMenu, Some(Exit)), Terminated);
        for choice in [Scan, Add, Delete, View, Clear] {
            assert_eq!(transition(MainMenu, Some(choice)), MainMenu);
        }
        assert_eq!(transition(MainMenu, None), MainMenu);
        assert_eq!(transition(Terminated, Some(Scan)), Terminated);
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Scan));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("scan"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[tokio::test]
    async fn test_menu_lists_choices_and_exits() {
        let (store, _dir) = test_store();
        let output = run_session(&store, &FakeService::new(), "6\n").await;

        assert!(output.starts_with("Main Menu\n=========\n1. Scan IP-address\n"));
        assert!(output.contains("6. Exit\n> "));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[tokio::test]
    async fn test_invalid_selection_reprompts() {
        let (store, _dir) = test_store();
        let output = run_session(&store, &FakeService::new(), "9\nhello\n6\n").await;

        assert_eq!(output.matches(MENU_TITLE).count(), 3);
        assert!(output.contains("Invalid selection '9'"));
        assert!(output.contains("Invalid selection 'hello'"));
    }

    #[tokio::test]
    async fn test_end_of_input_terminates() {
        let (store, _dir) = test_store();
        let output = run_session(&store, &FakeService::new(), "").await;
        assert!(output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_view_missing_file() {
        let (store, _dir) = test_store();
        let output = run_session(&store, &FakeService::new(), "4\n6\n").await;

        assert!(output.contains("does not exist, add IP addresses first."));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_view_empty_and_filled_list() {
        let (store, _dir) = test_store();
        fs::write(store.path(), "").unwrap();
        let output = run_session(&store, &FakeService::new(), "4\n6\n").await;
        assert!(output.contains("The list of IP addresses is empty."));

        fs::write(store.path(), "10.0.0.1\n::1\n").unwrap();
        let output = run_session(&store, &FakeService::new(), "4\n6\n").await;
        assert!(output.contains("IP addresses currently in the list:\n10.0.0.1\n::1\n"));
    }

    #[tokio::test]
    async fn test_add_and_delete() {
        let (store, _dir) = test_store();
        let output = run_session(
            &store,
            &FakeService::new(),
            "2\n10.0.0.5\n2\n999.1.1.1\n2\n10.0.0.6\n3\n10.0.0.5\n3\n10.0.0.9\n6\n",
        )
        .await;

        assert!(output.contains("10.0.0.5 has been added to"));
        assert!(output.contains("999.1.1.1 is not a valid IP address"));
        assert!(output.contains("The IP address 10.0.0.5 was removed from the list."));
        assert!(output.contains("The IP address 10.0.0.9 is not in the list, nothing removed."));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "10.0.0.6\n");
    }

    #[tokio::test]
    async fn test_delete_without_file() {
        let (store, _dir) = test_store();
        let output = run_session(&store, &FakeService::new(), "3\n10.0.0.1\n6\n").await;

        assert!(output.contains("does not exist, nothing to remove."));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_clear_declined_keeps_file() {
        let (store, _dir) = test_store();
        fs::write(store.path(), "10.0.0.1\n10.0.0.2\n").unwrap();

        let output = run_session(&store, &FakeService::new(), "5\nn\n6\n").await;

        assert!(output.contains("List will not be cleared."));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "10.0.0.1\n10.0.0.2\n");
    }

    #[tokio::test]
    async fn test_clear_confirmed_truncates() {
        let (store, _dir) = test_store();
        fs::write(store.path(), "10.0.0.1\n10.0.0.2\n").unwrap();

        let output = run_session(&store, &FakeService::new(), "5\ny\n6\n").await;

        assert!(output.contains("IP address file cleared."));
        assert_eq!(fs::metadata(store.path()).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_scan_down_host_prints_header_only() {
        let (store, _dir) = test_store();
        fs::write(store.path(), "192.168.1.1\n").unwrap();

        let output = run_session(&store, &FakeService::new(), "1\nn\n6\n").await;

        assert!(output.contains("Host 192.168.1.1 is down or unresponsive."));
        assert!(output.contains(&format!("{}\n", render_table(&[]))));
    }

    #[tokio::test]
    async fn test_scan_skips_invalid_and_saves_report() {
        let (store, dir) = test_store();
        fs::write(store.path(), "192.168.1.1\nnot-an-ip\n").unwrap();
        let service = FakeService::new().with_host(
            "192.168.1.1",
            HostScan::Up(vec![tcp(&[(22, PortState::Open), (80, PortState::Closed)])]),
        );
        let report = dir.path().join("scan_results.txt");

        let input = format!("1\ny\n{}\n6\n", report.display());
        let output = run_session(&store, &service, &input).await;

        assert_eq!(service.calls(), vec!["192.168.1.1".parse::<std::net::IpAddr>().unwrap()]);
        assert!(output.contains("Skipping invalid IP address: not-an-ip"));
        assert!(output.contains("Scan results have been saved to"));

        let saved = fs::read_to_string(&report).unwrap();
        assert!(output.contains(&saved));
        assert_eq!(saved.lines().count(), 6);
        assert!(saved.contains("| 192.168.1.1 | tcp      | 22   | open   |"));
        assert!(saved.ends_with("+\n"));
    }

    #[tokio::test]
    async fn test_scan_save_error_is_reported() {
        let (store, dir) = test_store();
        fs::write(store.path(), "192.168.1.1\n").unwrap();
        let bad_path = dir.path().join("no-such-dir").join("out.txt");

        let input = format!("1\ny\n{}\n6\n", bad_path.display());
        let output = run_session(&store, &FakeService::new(), &input).await;

        assert!(output.contains("failed to write"));
        assert!(output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_scan_with_missing_or_empty_list() {
        let (store, _dir) = test_store();
        let service = FakeService::new();

        let output = run_session(&store, &service, "1\n6\n").await;
        assert!(output.contains("does not exist, add IP addresses first."));

        fs::write(store.path(), "\n").unwrap();
        let output = run_session(&store, &service, "1\n6\n").await;
        assert!(output.contains("nothing to scan"));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_saved_report_uses_configured_format() {
        let (store, dir) = test_store();
        fs::write(store.path(), "10.0.0.1\n").unwrap();
        let service = FakeService::new()
            .with_host("10.0.0.1", HostScan::Up(vec![tcp(&[(443, PortState::Open)])]));
        let report = dir.path().join("scan.csv");

        let input = format!("1\ny\n{}\n6\n", report.display());
        let terminal = Terminal::new(input.as_bytes(), Vec::new());
        let mut menu = Menu::new(terminal, &store, &service, PortSpec::default())
            .with_report_format(ReportFormat::Csv);
        menu.run().await.unwrap();

        assert_eq!(
            fs::read_to_string(&report).unwrap(),
            "address,protocol,port,state,service\n10.0.0.1,tcp,443,open,\n"
        );
    }
}
