use dec_vte::{Action, Actor, Context, Parser};

#[derive(Default)]
struct Inspector;

impl Actor for Inspector {
    fn event(&mut self, ctx: Context<'_>, action: Option<Action>, ch: Option<char>) {
        let Some(action) = action else {
            println!("flush: raw={:?}", ctx.raw);
            return;
        };

        match action {
            Action::Print => println!("print: {}", ch.unwrap_or('?')),
            Action::Execute => println!("exec: {:#04x}", ch.map_or(0, |c| c as u32)),
            Action::CsiDispatch => println!(
                "CSI: final={ch:?} params={:?} intermediates={:?} (first={})",
                ctx.params.as_slice(),
                ctx.intermediates,
                ctx.params.get(0, 0),
            ),
            Action::EscDispatch => println!(
                "ESC: final={ch:?} intermediates={:?}",
                ctx.intermediates
            ),
            Action::Hook => println!(
                "DCS hook: params={:?} raw={:?}",
                ctx.params.as_slice(),
                ctx.raw
            ),
            Action::Put => println!("DCS put: {ch:?}"),
            Action::Unhook => println!("DCS unhook"),
            Action::OscStart => println!("OSC start"),
            Action::OscPut => println!("OSC put: {ch:?}"),
            Action::OscEnd => println!("OSC end"),
            _ => {}
        }
    }
}

fn main() -> Result<(), dec_vte::Error> {
    let input: &[u8] =
        b"\x1b[1;31mbold red\x1b[0m \xf0\x9f\x91\x8b\x07\x1b]0;title\x1b\\";
    let mut parser = Parser::new();
    let mut actor = Inspector;
    parser.parse(input, &mut actor)?;
    Ok(())
}
