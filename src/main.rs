use mazecarve::app::App;

fn main() -> std::io::Result<()> {
    // Logs go to a file: the terminal belongs to the maze display
    let file_appender = tracing_appender::rolling::never(".", "mazecarve.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::default().run(&mut stdout);
    App::restore_terminal(&mut stdout)?;
    result
}
