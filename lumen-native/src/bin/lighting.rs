use lumen_native::demos::lighting::Lighting;

fn main()
{
  lumen_native::launch::<Lighting>();
}
