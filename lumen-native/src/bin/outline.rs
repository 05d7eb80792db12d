use lumen_native::demos::outline::Outline;

fn main()
{
  lumen_native::launch::<Outline>();
}
