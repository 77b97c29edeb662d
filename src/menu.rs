use crate::runner::RunOptions;
use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Claim,
    Vote,
    ClaimAndVote,
    CheckBalances,
    ScheduleDaily,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Claim),
            "2" => Some(MenuChoice::Vote),
            "3" => Some(MenuChoice::ClaimAndVote),
            "4" => Some(MenuChoice::CheckBalances),
            "5" => Some(MenuChoice::ScheduleDaily),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    /// Options for the one-shot choices.
    pub fn run_options(&self) -> Option<RunOptions> {
        match self {
            MenuChoice::Claim => Some(RunOptions::claim_only()),
            MenuChoice::Vote => Some(RunOptions::vote_only()),
            MenuChoice::ClaimAndVote => Some(RunOptions::claim_and_vote()),
            MenuChoice::CheckBalances => Some(RunOptions::balances_only()),
            MenuChoice::ScheduleDaily | MenuChoice::Exit => None,
        }
    }
}

/// What the menu asks the caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RunOnce(RunOptions),
    Schedule(RunOptions),
    Exit,
}

pub fn parse_yes_no(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

fn print_menu() {
    println!("\n===== OPEN SCI AUTO BOT =====");
    println!("Please select an operation:");
    println!("1) Claim tokens from faucet");
    println!("2) Vote on projects");
    println!("3) Both claim tokens and vote");
    println!("4) Check balances");
    println!("5) Schedule daily operations");
    println!("6) Exit");
}

/// Interactive prompt over any line source (stdin in production).
pub struct Menu<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Menu<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    async fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        print!("{}", question);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }

    /// Reads until the user picks an action. End of input means exit.
    pub async fn next_action(&mut self) -> Result<MenuAction> {
        loop {
            print_menu();
            let Some(answer) = self.prompt("Enter your choice (1-6): ").await? else {
                return Ok(MenuAction::Exit);
            };

            let Some(choice) = MenuChoice::parse(&answer) else {
                println!("Invalid choice. Please enter a number between 1 and 6.");
                continue;
            };

            if let Some(options) = choice.run_options() {
                return Ok(MenuAction::RunOnce(options));
            }

            match choice {
                MenuChoice::Exit => return Ok(MenuAction::Exit),
                _ => match self.schedule_options().await? {
                    Some(options) if !options.is_empty() => return Ok(MenuAction::Schedule(options)),
                    Some(_) => println!("You must select at least one operation to schedule"),
                    None => return Ok(MenuAction::Exit),
                },
            }
        }
    }

    async fn schedule_options(&mut self) -> Result<Option<RunOptions>> {
        let questions = [
            "Include token claiming? (y/n): ",
            "Include project voting? (y/n): ",
            "Check token balances before/after operations? (y/n): ",
        ];
        let mut answers = [false; 3];
        for (answer, question) in answers.iter_mut().zip(questions) {
            match self.prompt(question).await? {
                Some(line) => *answer = parse_yes_no(&line),
                None => return Ok(None),
            }
        }

        Ok(Some(RunOptions {
            claim: answers[0],
            vote: answers[1],
            check_balances: answers[2],
        }))
    }
}
