use colored::Colorize;

use super::identity_client;
use crate::{
    error,
    identity::{IdentityProvider, require_user},
    info,
    questionnaire::{Questionnaire, Step},
    success,
    types::ProfileUpdate,
    utils, warning,
};

pub async fn questionnaire() {
    println!("{}", "Welcome to Guitar Coach!".bold());
    info!("To help us personalize your account, please answer the following questions.");

    let mut q = Questionnaire::default();
    match utils::prompt("Press Enter to get started (q to quit): ") {
        Ok(Some(line)) if line != "q" => q.start(),
        Ok(_) => return,
        Err(e) => error!("Cannot read input. Err: {}", e),
    }

    loop {
        let Some(question) = q.current() else {
            return;
        };

        println!();
        println!(
            "{} ({:.0}%)",
            format!("Question {} of {}", q.index() + 1, q.len()).bold(),
            q.progress()
        );
        println!("{}", question.text);
        for (i, option) in question.options.iter().enumerate() {
            let marker = if q.selected() == Some(*option) { "*" } else { " " };
            println!(" {}{}. {}", marker, i + 1, option);
        }

        let hint = if q.is_last() { "complete" } else { "next" };
        let label = if q.index() > 0 {
            format!("Option number, Enter for {}, b to go back, q to quit: ", hint)
        } else {
            format!("Option number, Enter for {}, q to quit: ", hint)
        };

        let input = match utils::prompt(&label) {
            Ok(Some(input)) => input,
            Ok(None) => return,
            Err(e) => error!("Cannot read input. Err: {}", e),
        };

        match input.as_str() {
            "q" => return,
            "b" => {
                q.back();
                continue;
            }
            "" => {}
            number => {
                let selected = utils::parse_index(number)
                    .and_then(|i| q.select(i).map_err(|e| e.to_string()));
                if let Err(message) = selected {
                    warning!("{}", message);
                    continue;
                }
            }
        }

        match q.next() {
            Ok(Step::Question(_)) => {}
            Ok(Step::Complete) => break,
            Err(e) => warning!("{}", e),
        }
    }

    complete().await;
}

async fn complete() {
    let identity = identity_client();
    let user = match require_user(&identity).await {
        Ok(user) => user,
        Err(e) => error!("{}", e.user_message()),
    };

    let update = ProfileUpdate {
        has_completed_questionnaire: Some(true),
        ..Default::default()
    };
    if let Err(e) = identity.update_profile(&user.id, &update).await {
        error!("Cannot save questionnaire: {}", e);
    }
    success!("Questionnaire completed. Thanks!");
}
