use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

pub type SharedSink = Rc<RefCell<dyn Write>>;
