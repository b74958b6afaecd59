use maskform::widgets::outputs::progress::ProgressStyle;
use maskform::{
    Caption, FormApp, MaskedInput, ProgressOutput, Terminal, TerminalEvent, TerminalSize,
    TextInput, frame_json, validators,
};
use std::io;
use std::time::Duration;

fn main() {
    if std::env::args().any(|arg| arg == "--headless") {
        headless();
        return;
    }
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}

fn demo_form() -> FormApp {
    FormApp::new()
        .with_input(
            TextInput::new("name", "Name")
                .with_placeholder("Full name")
                .with_validator(validators::required("Name is required")),
        )
        .with_input(MaskedInput::phone_us("phone", "Phone"))
        .with_input(MaskedInput::date_iso("dob", "Date of birth"))
        .with_input(
            MaskedInput::new("serial", "Serial number", "AA-####-X")
                .with_placeholder_char('·'),
        )
        .with_output(ProgressOutput::new("progress", "Completed").with_style(ProgressStyle::BlockClassic))
        .with_output(
            Caption::new("hint", "Tab next field · Enter submit · Esc quit").dim(),
        )
}

/// Render one frame as JSON on stdout, without touching the terminal.
fn headless() {
    let mut app = demo_form();
    app.sync_progress("progress");
    let size = TerminalSize {
        width: 80,
        height: 24,
    };
    let frame = app.build_frame(size);
    let json = frame_json::frame_to_json(&frame, size);
    println!("{:#}", json);
}

fn run() -> io::Result<()> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;

    let result = event_loop(&mut terminal);

    terminal.exit_raw_mode()?;
    result
}

fn event_loop(terminal: &mut Terminal) -> io::Result<()> {
    let mut app = demo_form();
    app.sync_progress("progress");

    let mut render_requested = true;

    loop {
        if render_requested {
            let frame = app.build_frame(terminal.size());
            terminal.draw(&frame)?;
            render_requested = false;
        }

        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(key_event) => {
                    if app.handle_key(key_event) {
                        app.sync_progress("progress");
                        render_requested = true;
                    }
                }
                TerminalEvent::Resize(_) => {
                    render_requested = true;
                }
                TerminalEvent::Tick => {}
            }
        }

        if app.should_exit() {
            break;
        }
    }

    terminal.move_below_frame()?;
    if app.was_submitted() {
        match serde_json::to_string_pretty(&app.values()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}
