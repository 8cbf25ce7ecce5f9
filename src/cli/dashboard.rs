use colored::Colorize;

use crate::{info, schedule::WeeklySchedule};

pub async fn dashboard() {
    println!("{}", "Dashboard".bold());
    info!("Find new songs to learn:       guitarcoach songs");
    info!("See my schedule:               guitarcoach schedule");
    info!("Generate new practice plans:   guitarcoach plan --song <title>");
    println!();
    println!("{}", "Today's Tasks".bold());
    info!("Fill out a practice plan to create new tasks");
}

pub async fn schedule() {
    println!("{}", "Weekly Schedule".bold());
    println!("{}", WeeklySchedule::default().to_table());
}
